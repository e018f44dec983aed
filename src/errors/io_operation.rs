#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Bind,
    Serve,
    Join,
}

impl std::fmt::Display for IoOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bind => write!(f, "bind"),
            Self::Serve => write!(f, "serve"),
            Self::Join => write!(f, "join"),
        }
    }
}
