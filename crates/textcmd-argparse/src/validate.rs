//! Running declared validations over bound values.

use crate::bind::Argv;
use crate::params::{Params, Validation};
use textcmd_schema::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// The predicate returned `false`.
    Rejected { field: String, message: String },
    /// The predicate itself failed.
    Errored { field: String, error: String },
}

impl ValidationFailure {
    pub fn field(&self) -> &str {
        match self {
            Self::Rejected { field, .. } | Self::Errored { field, .. } => field,
        }
    }
}

/// Run every validation of every argument and flag that has a bound value.
///
/// Fields are visited arguments first, then flags, each in declaration order;
/// validations run in declaration order. A failing field does not stop the
/// others, so the result lists every failure of the invocation.
pub fn validate(params: &Params, argv: &Argv) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    for arg in params.args() {
        if let Some(value) = argv.arg(arg.name()) {
            check_field(arg.name(), value, arg.validations(), &mut failures);
        }
    }
    for flag in params.flags() {
        if let Some(value) = argv.flag(flag.name()) {
            check_field(flag.name(), value, flag.validations(), &mut failures);
        }
    }

    failures
}

fn check_field(
    field: &str,
    value: &Value,
    validations: &[Validation],
    failures: &mut Vec<ValidationFailure>,
) {
    for validation in validations {
        match validation.check(value) {
            Ok(true) => {}
            Ok(false) => failures.push(ValidationFailure::Rejected {
                field: field.to_string(),
                message: validation.error_message().to_string(),
            }),
            Err(err) => {
                tracing::warn!(field, error = %err, "validation predicate failed");
                failures.push(ValidationFailure::Errored {
                    field: field.to_string(),
                    error: err.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::bind;
    use crate::params::{Argument, Flag};
    use textcmd_schema::ValueType;

    #[test]
    fn failures_from_args_and_flags_aggregate() {
        let params = Params::new(
            vec![
                Argument::builder("testarg", "desc", ValueType::String)
                    .default("defaultval")
                    .validation(Validation::new("firstError", |_| false))
                    .build()
                    .unwrap(),
            ],
            vec![
                Flag::builder("testflag", "desc", ValueType::Number)
                    .default(123)
                    .validation(Validation::new("secondError", |_| false))
                    .build()
                    .unwrap(),
            ],
        )
        .unwrap();

        let binding = bind(&params, &[]);
        let failures = validate(&params, &binding.argv);
        assert_eq!(
            failures,
            vec![
                ValidationFailure::Rejected {
                    field: "testarg".to_string(),
                    message: "firstError".to_string(),
                },
                ValidationFailure::Rejected {
                    field: "testflag".to_string(),
                    message: "secondError".to_string(),
                },
            ]
        );
    }

    #[test]
    fn every_validation_of_a_field_runs_in_order() {
        let params = Params::new(
            vec![
                Argument::builder("n", "desc", ValueType::Number)
                    .validation(Validation::new("must be positive", |v| {
                        v.as_f64().is_some_and(|n| n > 0.0)
                    }))
                    .validation(Validation::new("must be even", |v| {
                        v.as_f64().is_some_and(|n| n % 2.0 == 0.0)
                    }))
                    .build()
                    .unwrap(),
            ],
            vec![],
        )
        .unwrap();

        let binding = bind(&params, &["-3".to_string()]);
        // "-3" is a flag token, so the argument is missing and nothing is validated.
        assert!(binding.has_missing_required());
        assert!(validate(&params, &binding.argv).is_empty());

        let binding = bind(&params, &["--".to_string(), "-3".to_string()]);
        let messages: Vec<String> = validate(&params, &binding.argv)
            .into_iter()
            .map(|f| match f {
                ValidationFailure::Rejected { message, .. } => message,
                other => panic!("unexpected failure: {other:?}"),
            })
            .collect();
        assert_eq!(messages, vec!["must be positive", "must be even"]);
    }

    #[test]
    fn erroring_predicate_is_its_own_failure() {
        let params = Params::new(
            vec![],
            vec![
                Flag::builder("name", "desc", ValueType::String)
                    .default("yo")
                    .validation(Validation::fallible("error", |_| {
                        anyhow::bail!("predicate exploded")
                    }))
                    .build()
                    .unwrap(),
            ],
        )
        .unwrap();

        let binding = bind(&params, &[]);
        let failures = validate(&params, &binding.argv);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field(), "name");
        assert!(matches!(&failures[0], ValidationFailure::Errored { error, .. } if error.contains("exploded")));
    }

    #[test]
    fn unbound_fields_are_skipped() {
        let params = Params::new(
            vec![
                Argument::builder("n", "desc", ValueType::Number)
                    .validation(Validation::new("never", |_| false))
                    .build()
                    .unwrap(),
            ],
            vec![],
        )
        .unwrap();

        let binding = bind(&params, &["abc".to_string()]);
        assert!(!binding.is_clean());
        assert!(validate(&params, &binding.argv).is_empty());
    }
}
