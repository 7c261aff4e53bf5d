/// The authenticated caller. Every private read or write is scoped to `user_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Owner {
    pub fn new(user_id: impl Into<String>) -> Self {
        Owner {
            user_id: user_id.into(),
            name: None,
            email: None,
        }
    }
}
