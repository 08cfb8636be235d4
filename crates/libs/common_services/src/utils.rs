/// Generates a short random alphanumeric id, e.g. for naming workers.
#[must_use]
pub fn nice_id(length: usize) -> String {
    std::iter::repeat_with(fastrand::alphanumeric)
        .take(length)
        .collect()
}
