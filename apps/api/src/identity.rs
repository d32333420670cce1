use uuid::Uuid;

/// Fixed single-user placeholder pending real authentication.
pub const PLACEHOLDER_USER_ID: Uuid = Uuid::from_u128(1);

/// The identity every data-access call runs as. All queries filter by this
/// user id, so swapping in a real per-request identity later only touches
/// request extraction, not the query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    user_id: Uuid,
}

impl Identity {
    pub fn new(user_id: Uuid) -> Self {
        Identity { user_id }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_stable() {
        assert_eq!(
            PLACEHOLDER_USER_ID.to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
        assert_eq!(Identity::new(PLACEHOLDER_USER_ID).user_id(), PLACEHOLDER_USER_ID);
    }
}
