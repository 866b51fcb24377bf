use crate::RequestId;

/// Side effects requested by `update`; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PostChat {
        request_id: RequestId,
        query: String,
        k: u32,
    },
    PostIngest {
        request_id: RequestId,
        url: String,
    },
    PostAsk {
        request_id: RequestId,
        question: String,
        url: String,
    },
    CheckHealth,
}
