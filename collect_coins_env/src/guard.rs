use tracing::debug;

use crate::{ActionValidity, AecEnv, AgentId, AgentRecord, EnvError};

/// The legality check of an environment that implements [`ActionValidity`].
pub type CheckFn<E> = fn(&E, <E as AecEnv>::Action, AgentId) -> bool;
/// The alternative provider of an environment that implements [`ActionValidity`].
pub type ProvideFn<E> = fn(&mut E, <E as AecEnv>::Action, AgentId) -> <E as AecEnv>::Action;

/// Makes sure only legal actions reach the wrapped environment.
///
/// Every action passed to [`AecEnv::step()`] is checked first. If the check
/// fails, the provider is asked for a replacement, the replacement is passed to
/// the report callback, and the replacement is stepped instead. An action that
/// passes the check is stepped unchanged, and nothing is reported.
pub struct EnsureValidAction<E, C, P, R> {
    env: E,
    check: C,
    provide: P,
    report: R,
}

impl<E, C, P, R> EnsureValidAction<E, C, P, R>
where
    E: AecEnv,
    C: FnMut(&E, E::Action, AgentId) -> bool,
    P: FnMut(&mut E, E::Action, AgentId) -> E::Action,
    R: FnMut(E::Action),
{
    pub fn new(env: E, check: C, provide: P, report: R) -> Self {
        Self {
            env,
            check,
            provide,
            report,
        }
    }
}

impl<E, R> EnsureValidAction<E, CheckFn<E>, ProvideFn<E>, R>
where
    E: ActionValidity,
    R: FnMut(E::Action),
{
    /// Uses the environment's own legality check and alternative provider.
    pub fn with_env_rules(env: E, report: R) -> Self {
        Self::new(
            env,
            E::check_action_valid,
            E::provide_alternative_valid_action,
            report,
        )
    }
}

impl<E, C, P, R> EnsureValidAction<E, C, P, R> {
    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E, C, P, R> AecEnv for EnsureValidAction<E, C, P, R>
where
    E: AecEnv,
    C: FnMut(&E, E::Action, AgentId) -> bool,
    P: FnMut(&mut E, E::Action, AgentId) -> E::Action,
    R: FnMut(E::Action),
{
    type Action = E::Action;
    type Observation = E::Observation;

    fn reset(&mut self, seed: Option<u64>) {
        self.env.reset(seed)
    }

    fn step(&mut self, action: E::Action) -> Result<(), EnvError> {
        let agent = self.env.agent_selection();
        let action = if (self.check)(&self.env, action, agent) {
            action
        } else {
            let substitute = (self.provide)(&mut self.env, action, agent);
            debug!(%agent, proposed = ?action, ?substitute, "Replaced illegal action");
            (self.report)(substitute);
            substitute
        };
        self.env.step(action)
    }

    fn agent_selection(&self) -> AgentId {
        self.env.agent_selection()
    }

    fn observe(&self, agent: AgentId) -> E::Observation {
        self.env.observe(agent)
    }

    fn record(&self, agent: AgentId) -> &AgentRecord {
        self.env.record(agent)
    }

    fn render(&self) -> String {
        self.env.render()
    }
}

impl<E, C, P, R> ActionValidity for EnsureValidAction<E, C, P, R>
where
    E: ActionValidity,
    C: FnMut(&E, E::Action, AgentId) -> bool,
    P: FnMut(&mut E, E::Action, AgentId) -> E::Action,
    R: FnMut(E::Action),
{
    fn check_action_valid(&self, action: E::Action, agent: AgentId) -> bool {
        self.env.check_action_valid(action, agent)
    }

    fn provide_alternative_valid_action(&mut self, action: E::Action, agent: AgentId) -> E::Action {
        self.env.provide_alternative_valid_action(action, agent)
    }
}
