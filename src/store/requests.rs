use crate::models::PropertyRequest;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestsState {
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
    /// Newest first after a local add; server order after a fetch.
    pub items: Vec<PropertyRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestsAction {
    Started,
    Settled,
    FetchSucceeded(Vec<PropertyRequest>),
    FetchFailed(String),
    AddSucceeded(PropertyRequest),
    AddFailed(String),
}

pub fn reduce(state: &mut RequestsState, action: RequestsAction) {
    match action {
        RequestsAction::Started => {
            state.loading = true;
            state.error = None;
            state.success = false;
        }
        RequestsAction::Settled => state.loading = false,
        RequestsAction::FetchSucceeded(items) => {
            state.loading = false;
            state.success = true;
            state.items = items;
        }
        RequestsAction::AddSucceeded(request) => {
            state.loading = false;
            state.success = true;
            state.items.insert(0, request);
        }
        RequestsAction::FetchFailed(message) | RequestsAction::AddFailed(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}
