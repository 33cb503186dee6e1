use textcmd_argparse::{BindIssue, ValidationFailure};
use textcmd_schema::{StringCatalog, render};

fn issue_line(issue: &BindIssue, strings: &StringCatalog) -> String {
    match issue {
        BindIssue::MissingRequired { name } => {
            render(&strings.err_missing_argument, &[("name", name.as_str())])
        }
        BindIssue::InvalidValue {
            name,
            raw,
            expected,
        } => render(
            &strings.err_type_mismatch,
            &[("name", name.as_str()), ("value", raw.as_str()), ("type", expected.as_str())],
        ),
        BindIssue::MissingFlagValue { name } => {
            render(&strings.err_missing_flag_value, &[("name", name.as_str())])
        }
    }
}

fn failure_line(failure: &ValidationFailure, strings: &StringCatalog) -> String {
    match failure {
        ValidationFailure::Rejected { message, .. } => message.clone(),
        // The predicate's own error is logged, not shown.
        ValidationFailure::Errored { field, .. } => {
            render(&strings.err_validation_crashed, &[("name", field.as_str())])
        }
    }
}

/// One multi-line error reply covering every binding issue and validation failure.
pub(crate) fn render_report(
    issues: &[BindIssue],
    failures: &[ValidationFailure],
    strings: &StringCatalog,
) -> String {
    let mut out = strings.err_header.clone();
    let lines = issues
        .iter()
        .map(|i| issue_line(i, strings))
        .chain(failures.iter().map(|f| failure_line(f, strings)));
    for line in lines {
        out.push_str("\n  - ");
        out.push_str(&line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcmd_argparse::ValueType;

    #[test]
    fn report_lists_every_problem_under_one_header() {
        let issues = vec![
            BindIssue::MissingRequired {
                name: "a".to_string(),
            },
            BindIssue::InvalidValue {
                name: "n".to_string(),
                raw: "abc".to_string(),
                expected: ValueType::Number,
            },
        ];
        let failures = vec![
            ValidationFailure::Rejected {
                field: "x".to_string(),
                message: "x is too long".to_string(),
            },
            ValidationFailure::Errored {
                field: "y".to_string(),
                error: "secret detail".to_string(),
            },
        ];

        let text = render_report(&issues, &failures, &StringCatalog::default());
        assert_eq!(
            text,
            "Error: the command could not be executed:\n  \
             - missing required argument \"a\"\n  \
             - \"abc\" is not a valid number for \"n\"\n  \
             - x is too long\n  \
             - \"y\" could not be validated"
        );
        assert!(!text.contains("secret detail"));
    }
}
