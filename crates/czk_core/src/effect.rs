#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchFeed {
        request_id: crate::RequestId,
        url: String,
    },
}
