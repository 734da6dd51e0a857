use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?").expect("placeholder pattern is valid"));

/// Collapses whitespace and rewrites `?` placeholders to Postgres `$1, $2, ...`.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 0;
    PLACEHOLDER
        .replace_all(&cleaned, |_: &Captures| {
            param_index += 1;
            format!("${}", param_index)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::sql;

    #[test]
    fn numbers_placeholders_in_order() {
        let query = sql(r#"
            UPDATE users
            SET spent = spent + ?
            WHERE id = ? AND spent + ? <= budget
        "#);
        assert_eq!(
            query,
            "UPDATE users SET spent = spent + $1 WHERE id = $2 AND spent + $3 <= budget"
        );
    }

    #[test]
    fn leaves_queries_without_placeholders_alone() {
        assert_eq!(sql("SELECT  COUNT(*)\n FROM users"), "SELECT COUNT(*) FROM users");
    }
}
