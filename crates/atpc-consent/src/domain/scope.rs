//! # Scope Matching
//!
//! Scope strings are colon-delimited hierarchies (`tool:http:get`,
//! `data:public_web:read`). A granted scope authorizes a requested scope if
//! it equals it, or is a colon-delimited prefix of it.

pub fn scope_authorizes(granted: &str, requested: &str) -> bool {
    granted == requested || requested.starts_with(&format!("{granted}:"))
}

/// Returns `true` iff any scope in `granted` authorizes `requested`.
pub fn any_scope_authorizes(granted: &[String], requested: &str) -> bool {
    granted.iter().any(|g| scope_authorizes(g, requested))
}
