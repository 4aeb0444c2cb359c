//! Identity Classifier - Address vs. Service-Name Detection
//!
//! Callers of the aggregation API pass a single token that is either a
//! literal IPv4 address ("10.0.0.5") or a logical service name
//! ("com.example.OrderService"). The token is an address iff it matches
//! the dotted-quad grammar: four groups of 0-255 separated by periods.
//! Anything else non-empty is a service name.
//!
//! IPv6 literals are not recognized and classify as service names;
//! the mesh registries we target only publish IPv4 addresses today.

use crate::domain::error::GatewayError;

/// Outcome of classifying a lookup token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified {
  /// A literal dotted-quad IPv4 address.
  Address,
  /// A logical service name.
  ServiceName,
}

/// Classify a lookup token.
///
/// Pure function. The only failure mode is an empty (or all-whitespace)
/// token, which is rejected before any registry traffic happens.
pub fn classify(token: &str) -> Result<Classified, GatewayError> {
  let token = token.trim();
  if token.is_empty() {
    return Err(GatewayError::Classification(token.to_string()));
  }
  if is_dotted_quad(token) {
    Ok(Classified::Address)
  } else {
    Ok(Classified::ServiceName)
  }
}

/// Strict dotted-quad check: exactly four all-digit groups, each <= 255.
///
/// No partial matches: "999.1.1.1" and "1.2.3" are service names.
fn is_dotted_quad(token: &str) -> bool {
  let mut groups = 0usize;
  for group in token.split('.') {
    groups += 1;
    if groups > 4 {
      return false;
    }
    if group.is_empty() || group.len() > 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
      return false;
    }
    // group is at most 3 digits, so u16 cannot overflow
    match group.parse::<u16>() {
      Ok(octet) if octet <= 255 => {}
      _ => return false,
    }
  }
  groups == 4
}
