/// Failures at the fallible seams of the client. None of them are fatal:
/// the session logs and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transport closed")]
    Closed,
}

#[cfg(not(target_arch = "wasm32"))]
impl From<tungstenite::Error> for ClientError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                ClientError::Closed
            }
            other => ClientError::Transport(other.to_string()),
        }
    }
}
