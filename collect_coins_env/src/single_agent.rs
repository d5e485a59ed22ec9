use std::collections::BTreeMap;

use tracing::trace;

use crate::{AecEnv, AgentId, EnvError, Info, Policy, StepResult};

/// The policies of the agents that are played automatically.
pub type Policies<O, A> = BTreeMap<AgentId, Box<dyn Policy<O, A>>>;

/// Turns a multi-agent environment into one where only a single agent is
/// stepped from outside.
///
/// Whenever an auto-played agent is selected, its policy is asked for an
/// action, until it is an outside agent's turn again. Once the episode is
/// over, the auto-played agents keep being cycled through with dead steps,
/// so [`SingleAgentEnv::step()`] always returns to an outside agent.
pub struct SingleAgentEnv<E: AecEnv> {
    env: E,
    act_others: Policies<E::Observation, E::Action>,
}

impl<E: AecEnv> SingleAgentEnv<E> {
    /// Fails with [`EnvError::NoControlledAgent`] if every agent has a policy.
    pub fn new(env: E, act_others: Policies<E::Observation, E::Action>) -> Result<Self, EnvError> {
        if AgentId::ALL
            .iter()
            .all(|agent| act_others.contains_key(agent))
        {
            return Err(EnvError::NoControlledAgent);
        }
        Ok(Self { env, act_others })
    }

    /// Auto-plays `opponent` with `policy`, leaving the other agent in
    /// outside control.
    pub fn with_opponent(
        env: E,
        opponent: AgentId,
        policy: impl Policy<E::Observation, E::Action> + 'static,
    ) -> Self {
        let mut act_others: Policies<E::Observation, E::Action> = BTreeMap::new();
        act_others.insert(opponent, Box::new(policy));
        Self { env, act_others }
    }

    /// The first agent that is not played automatically.
    pub fn controlled_agent(&self) -> AgentId {
        AgentId::ALL
            .into_iter()
            .find(|agent| !self.act_others.contains_key(agent))
            .unwrap_or(AgentId::PLAYER_0)
    }

    pub fn is_auto_played(&self, agent: AgentId) -> bool {
        self.act_others.contains_key(&agent)
    }

    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_inner(self) -> E {
        self.env
    }

    /// Starts a new episode and plays until it is an outside agent's turn.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<(E::Observation, Info), EnvError> {
        self.env.reset(seed);
        self.play_others()?;
        let StepResult {
            observation, info, ..
        } = self.env.last();
        Ok((observation, info))
    }

    /// Steps the selected agent, then plays until it is an outside agent's
    /// turn again, and returns what the agent that stepped gets to see.
    ///
    /// The reward is everything that accrued for that agent since it last
    /// acted.
    pub fn step(&mut self, action: E::Action) -> Result<StepResult<E::Observation>, EnvError> {
        let agent = self.env.agent_selection();
        if self.is_auto_played(agent) {
            return Err(EnvError::NotControlledAgentsTurn { agent });
        }
        self.env.step(action)?;
        self.play_others()?;
        Ok(self.env.result_for(agent))
    }

    pub fn render(&self) -> String {
        self.env.render()
    }

    fn play_others(&mut self) -> Result<(), EnvError> {
        loop {
            let agent = self.env.agent_selection();
            let Some(policy) = self.act_others.get_mut(&agent) else {
                return Ok(());
            };
            let action = policy.act(&self.env.observe(agent));
            trace!(%agent, ?action, "Auto-played");
            self.env.step(action)?;
        }
    }
}
