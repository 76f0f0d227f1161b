/// Positional selectors that restrict a run to some units.
///
/// Every selector may hold several `|`-separated alternatives. A unit is
/// selected when any alternative matches its identifier:
///
/// * the alternative equals the whole identifier, or
/// * it equals one separator-delimited segment of the identifier, or
/// * the identifier contains it between two separators, or ends with it
///   after a separator (this lets `a/b` match `x/a/b`).
///
/// The rules are a plain OR; none takes precedence over another. This is
/// segment matching, not glob or regex matching: `butt` does not select
/// `common/buttons`.
#[derive(Debug, Clone)]
pub struct Selection {
    alternatives: Vec<String>,
    separator: char,
}

impl Selection {
    pub fn new<I, S>(selectors: I, separator: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives = selectors
            .into_iter()
            .flat_map(|s| {
                s.as_ref()
                    .split('|')
                    .filter(|alt| !alt.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self {
            alternatives,
            separator,
        }
    }

    /// True when no (non-empty) selector was given, so every unit runs.
    pub fn selects_all(&self) -> bool {
        self.alternatives.is_empty()
    }

    pub fn is_selected(&self, identifier: &str) -> bool {
        self.selects_all()
            || self
                .alternatives
                .iter()
                .any(|alt| matches(alt, identifier, self.separator))
    }
}

fn matches(alt: &str, identifier: &str, sep: char) -> bool {
    alt == identifier
        || identifier.split(sep).any(|segment| segment == alt)
        || identifier.contains(&format!("{sep}{alt}{sep}"))
        || identifier.ends_with(&format!("{sep}{alt}"))
}
