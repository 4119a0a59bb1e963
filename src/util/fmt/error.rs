use std::fmt;

use crate::token::Spanned;

/// Displays the inner error. The alternate form (`{:#}`) prefixes it with the
/// span, as in `4..5: expected statement, but got Plus`.
impl<E: fmt::Display> fmt::Display for Spanned<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Spanned { span, inner: error } = self;

        if f.alternate() {
            write!(f, "{span}: ")?;
        }
        write!(f, "{error}")
    }
}

impl<E: fmt::Display + fmt::Debug> std::error::Error for Spanned<E> {}
