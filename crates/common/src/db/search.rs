//! Customer search predicate builder
//!
//! Turns a free-text query into an OR'd group of parameterized predicates
//! over the `customer` table. Placeholders and bound values are produced
//! together so their order cannot drift apart.

use sea_orm::Value;

/// Wrap a term for a substring `LIKE` match
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

/// OR'd customer predicates with their bound values, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFilter {
    predicates: Vec<&'static str>,
    values: Vec<Value>,
}

impl CustomerFilter {
    /// Build the filter for `query`. Blank queries produce no filter.
    ///
    /// Predicates, in binding order:
    /// 1. exact `customer_id` when the query is all digits
    /// 2. first name substring
    /// 3. last name substring
    /// 4. "first last" substring
    /// 5. "last first" substring
    /// 6. first name ~ token 1 AND last name ~ token 2, for two-token queries
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let mut filter = Self {
            predicates: Vec::new(),
            values: Vec::new(),
        };

        if query.chars().all(|c| c.is_ascii_digit()) {
            // Digit strings too large for an id simply fall through to the LIKEs
            if let Ok(id) = query.parse::<u16>() {
                filter.push("customer_id = ?", [Value::from(id)]);
            }
        }

        let pattern = like_pattern(query);
        filter.push("first_name LIKE ?", [Value::from(pattern.clone())]);
        filter.push("last_name LIKE ?", [Value::from(pattern.clone())]);
        filter.push(
            "CONCAT(first_name, ' ', last_name) LIKE ?",
            [Value::from(pattern.clone())],
        );
        filter.push(
            "CONCAT(last_name, ' ', first_name) LIKE ?",
            [Value::from(pattern)],
        );

        let tokens: Vec<&str> = query.split_whitespace().collect();
        if let [first, last] = tokens.as_slice() {
            filter.push(
                "(first_name LIKE ? AND last_name LIKE ?)",
                [
                    Value::from(like_pattern(first)),
                    Value::from(like_pattern(last)),
                ],
            );
        }

        Some(filter)
    }

    fn push<const N: usize>(&mut self, predicate: &'static str, values: [Value; N]) {
        self.predicates.push(predicate);
        self.values.extend(values);
    }

    /// Parenthesized SQL fragment for a `WHERE` clause
    pub fn sql(&self) -> String {
        format!("({})", self.predicates.join(" OR "))
    }

    /// Bound values, in placeholder order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
