use crate::models::UserInfo;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentsState {
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
    pub agents: Vec<UserInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentsAction {
    Started,
    Settled,
    FetchSucceeded(Vec<UserInfo>),
    FetchFailed(String),
}

pub fn reduce(state: &mut AgentsState, action: AgentsAction) {
    match action {
        AgentsAction::Started => {
            state.loading = true;
            state.error = None;
            state.success = false;
        }
        AgentsAction::Settled => state.loading = false,
        AgentsAction::FetchSucceeded(agents) => {
            state.loading = false;
            state.success = true;
            state.agents = agents;
        }
        AgentsAction::FetchFailed(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}
