/// Build an [`Attrs`](crate::Attrs) map from heterogeneous values.
///
/// ```rust
/// use std::time::Duration;
/// use errorx::{attrs, ComposableError};
///
/// let mut err = ComposableError::from_code(408);
/// err.with_attrs(attrs! {
///     "endpoint" => "/v1/orders",
///     "timeout" => Duration::from_secs(30),
///     "retries" => 2,
/// });
/// assert_eq!(err.attrs().len(), 3);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attrs::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::Attrs::new();
        $(
            attrs.insert(::std::string::String::from($key), $crate::AttrValue::from($value));
        )+
        attrs
    }};
}

#[cfg(test)]
mod tests {
    use crate::{AttrValue, Attrs};

    #[test]
    fn empty_and_trailing_comma() {
        let empty: Attrs = attrs!();
        assert!(empty.is_empty());

        let built = attrs! { "a" => 1, "b" => "two", };
        assert_eq!(built.get("a"), Some(&AttrValue::Int(1)));
        assert_eq!(built.get("b"), Some(&AttrValue::String("two".into())));
    }

    #[test]
    fn repeated_key_keeps_last() {
        let built = attrs! { "k" => 1, "k" => 2u64 };
        assert_eq!(built.len(), 1);
        assert_eq!(built.get("k"), Some(&AttrValue::Uint64(2)));
    }
}
