//! Sorted-set member encoding for user ids.
//!
//! Members are zero-padded to a fixed width so that the store's tie-break on
//! member bytes matches numeric id order. Without the padding, two users
//! registered in the same millisecond would order `"10"` before `"9"`.

/// Digits in the largest positive `i64`.
const MEMBER_WIDTH: usize = 19;

/// Encode a positive user id as a wait/proceed set member.
pub fn member_for(user_id: i64) -> String {
    format!("{user_id:0width$}", width = MEMBER_WIDTH)
}

/// Decode a member back into its user id.
pub fn user_for(member: &str) -> Option<i64> {
    member.parse::<i64>().ok().filter(|id| *id > 0)
}
