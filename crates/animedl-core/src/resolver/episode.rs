//! Reverse positional indexing of the episode list.
//!
//! The site lists episodes newest first, so episode 1 is the last element in
//! document order. Episode `n` of a list of length `len` sits at 1-based
//! position `len - n + 1`.

/// 0-based document index of episode `episode` in a list of `len` entries,
/// or `None` if the episode is not in the rendered range.
pub fn reverse_index(len: usize, episode: u32) -> Option<usize> {
    let n = usize::try_from(episode).ok()?;
    if n == 0 || n > len {
        return None;
    }
    Some(len - n)
}
