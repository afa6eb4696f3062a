/// Return `message` unchanged.
pub fn echo(message: String) -> String {
    message
}
