/// Blocking, dismiss-only messages shown to the user.
pub trait AlertGateway {
    fn alert(&self, title: &str, message: &str);
}
