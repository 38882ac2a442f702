//! Resource kind compatibility
//!
//! A kind is a lineage of tags ordered general → specific, e.g.
//! `fd, socket, tcp_socket`. Compatibility is a relation, not an
//! equivalence: passing something more specialized than required is always
//! fine, passing something more generic only when `precise` is false.

/// Returns true if a resource of kind `src` can be passed where kind `dst` is expected.
///
/// With `precise` set, a less specialized `src` (e.g. `fd`) never satisfies
/// a more specialized `dst` (e.g. `fd, socket`).
///
/// # Example
/// ```
/// use resdep::compat::is_compatible_kind;
///
/// assert!(is_compatible_kind(&["fd"], &["fd", "socket"], true));
/// assert!(!is_compatible_kind(&["fd", "socket"], &["fd"], true));
/// assert!(is_compatible_kind(&["fd", "socket"], &["fd"], false));
/// ```
pub fn is_compatible_kind<D, S>(dst: &[D], src: &[S], precise: bool) -> bool
where
    D: AsRef<str>,
    S: AsRef<str>,
{
    let mut dst = dst;
    let mut src = src;
    if dst.len() > src.len() {
        // dst is more specialized, e.g. dst=socket, src=fd
        if precise {
            return false;
        }
        dst = &dst[..src.len()];
    }
    if src.len() > dst.len() {
        // src is more specialized, e.g. dst=fd, src=socket
        src = &src[..dst.len()];
    }
    dst.iter()
        .zip(src)
        .all(|(d, s)| d.as_ref() == s.as_ref())
}
