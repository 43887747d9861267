use serde::{Deserialize, Deserializer};

/// A field in a partial update.
///
/// Use with `#[serde(default)]`: a missing key stays [`Patch::Unset`], while
/// `null` or `""` become [`Patch::Empty`]. Callers decide what an explicit
/// empty value means for each field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Unset,
    Empty,
    Set(T),
}

impl<T> Patch<T> {
    /// The new value, if there is one. `Unset` and `Empty` both mean "leave it".
    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Set(v) => Some(v),
            Patch::Unset | Patch::Empty => None,
        }
    }
}

impl<'de> Deserialize<'de> for Patch<String> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<String>::deserialize(deserializer)? {
            None => Patch::Empty,
            Some(s) if s.is_empty() => Patch::Empty,
            Some(s) => Patch::Set(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        password: Patch<String>,
    }

    #[rstest]
    #[case::absent(r#"{}"#, Patch::Unset)]
    #[case::null(r#"{"password": null}"#, Patch::Empty)]
    #[case::empty(r#"{"password": ""}"#, Patch::Empty)]
    #[case::value(r#"{"password": "s3cret-pass"}"#, Patch::Set("s3cret-pass".to_string()))]
    fn deserializes_three_states(#[case] json: &str, #[case] expected: Patch<String>) {
        let body: Body = serde_json::from_str(json).unwrap();
        assert_eq!(body.password, expected);
    }

    #[test]
    fn only_set_yields_a_value() {
        assert_eq!(Patch::<String>::Unset.into_value(), None);
        assert_eq!(Patch::<String>::Empty.into_value(), None);
        assert_eq!(Patch::Set(3).into_value(), Some(3));
    }
}
