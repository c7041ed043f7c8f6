use crate::catalog::ModelDescriptor;

/// Text used by [`CannedReply`] when no other body is configured.
pub const DEFAULT_REPLY_BODY: &str = "Tôi đã nhận được yêu cầu của bạn. \
    Đây là phản hồi mẫu từ Operations Agent. Trong thực tế, tôi sẽ xử lý \
    yêu cầu cụ thể của bạn và cung cấp thông tin chính xác về đơn hàng, \
    tồn kho hoặc các tác vụ vận hành khác.";

/// Produces the content of an assistant reply.
///
/// Implementations must be stateless from the caller's point of view:
/// the same model and prompt may be composed any number of times.
pub trait ReplyComposer: Send + Sync {
    /// Composes the reply to `prompt`, labelled for `model`.
    fn compose(&self, model: &ModelDescriptor, prompt: &str) -> String;
}

impl<F> ReplyComposer for F
where
    F: Fn(&ModelDescriptor, &str) -> String + Send + Sync,
{
    #[inline]
    fn compose(&self, model: &ModelDescriptor, prompt: &str) -> String {
        self(model, prompt)
    }
}

/// A composer that ignores the prompt and answers with fixed text,
/// prefixed by the model name in brackets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CannedReply {
    body: String,
}

impl CannedReply {
    /// Creates a composer answering with `body`.
    #[inline]
    pub fn with_body<S: Into<String>>(body: S) -> Self {
        Self { body: body.into() }
    }
}

impl Default for CannedReply {
    #[inline]
    fn default() -> Self {
        Self::with_body(DEFAULT_REPLY_BODY)
    }
}

impl ReplyComposer for CannedReply {
    fn compose(&self, model: &ModelDescriptor, _prompt: &str) -> String {
        format!("[{}] {}", model.name, self.body)
    }
}
