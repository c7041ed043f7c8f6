//! The mock conversation history a fresh session starts with.

use ops_agent_core::Conversation;

const SEED_JSON: &str = include_str!("./seed.json");

/// Prompts offered when the active conversation is empty.
pub const SUGGESTIONS: [&str; 6] = [
    "Cập nhật đơn: Sửa thông tin đơn",
    "Tìm đơn hàng",
    "Theo dõi trạng thái đơn",
    "Kiểm tra tồn kho",
    "Tạo phiếu nhập kho",
    "Tạo phiếu xuất kho",
];

/// Returns the bundled mock conversations, first one first.
///
/// Every call returns a fresh copy, so restarting a session always
/// starts from the same data.
pub fn conversations() -> Vec<Conversation> {
    match serde_json::from_str(SEED_JSON) {
        Ok(conversations) => conversations,
        Err(err) => {
            error!("bundled seed data is invalid: {err}");
            Vec::new()
        }
    }
}
