//! Smart keys: compound navigation paths such as `a.b[0][1].c`.
//!
//! Grammar:
//!
//! ```text
//! smart_key = segment ("." segment)*
//! segment   = [key] ("[" index "]")*
//! key       = any run of characters except "." and "["
//! index     = one or more decimal digits
//! ```
//!
//! Only the first segment may consist of brackets alone. Key names may be
//! empty, so `..a` is three steps: `""`, `""` and `"a"`.

use std::fmt::Write;

use crate::error::Error;

/// One navigation step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// Parse a smart key into navigation steps.
///
/// # Errors
///
/// Returns [`Error::InvalidSmartKey`] naming the first malformed segment:
/// an unclosed `[`, text after a `]`, a non-numeric index, or a bracket-only
/// segment after the first.
///
/// # Example
///
/// ```
/// use gson::{parse_smart_key, Step};
///
/// let steps = parse_smart_key("a.b[0][1].c").unwrap();
/// assert_eq!(
///     steps,
///     vec![
///         Step::Key("a".into()),
///         Step::Key("b".into()),
///         Step::Index(0),
///         Step::Index(1),
///         Step::Key("c".into()),
///     ]
/// );
/// assert!(parse_smart_key("a[0").is_err());
/// ```
pub fn parse_smart_key(smart_key: &str) -> Result<Vec<Step>, Error> {
    let mut steps = Vec::new();
    for (segment, part) in smart_key.split('.').enumerate() {
        let invalid = |reason: &str| Error::InvalidSmartKey {
            segment,
            part: part.to_owned(),
            reason: reason.to_owned(),
        };

        let (key, mut rest) = match part.find('[') {
            None => (part, ""),
            Some(l) => part.split_at(l),
        };
        if key.is_empty() && !rest.is_empty() {
            if segment > 0 {
                return Err(invalid("index without a key is only allowed first"));
            }
        } else {
            steps.push(Step::Key(key.to_owned()));
        }

        while !rest.is_empty() {
            let inner = rest
                .strip_prefix('[')
                .ok_or_else(|| invalid("expected '[' after ']'"))?;
            let r = inner.find(']').ok_or_else(|| invalid("unclosed '['"))?;
            let digits = &inner[..r];
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("index must be decimal digits"));
            }
            let index = digits
                .parse::<usize>()
                .map_err(|_| invalid("index out of range"))?;
            steps.push(Step::Index(index));
            rest = &inner[r + 1..];
        }
    }
    Ok(steps)
}

/// Format steps back into a smart key.
///
/// The inverse of [`parse_smart_key`] for keys that contain neither `.`
/// nor `[`. An empty slice formats as the empty string.
///
/// # Example
///
/// ```
/// use gson::{format_smart_key, Step};
///
/// let steps = [Step::Index(0), Step::Key("a".into()), Step::Index(2)];
/// assert_eq!(format_smart_key(&steps), "[0].a[2]");
/// ```
pub fn format_smart_key(steps: &[Step]) -> String {
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        match step {
            Step::Key(key) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(key);
            }
            Step::Index(index) => {
                let _ = write!(out, "[{index}]");
            }
        }
    }
    out
}
