//! Argument range checks. Pure, run before anything is encoded.

use crate::domain::RangeError;

use super::CommandSpec;

/// Check `value` lies in `[min, max)`.
pub fn validate(value: i64, min: i64, max: i64) -> Result<(), RangeError> {
    if value >= min && value < max {
        Ok(())
    } else {
        Err(RangeError {
            name: "value",
            value,
            min,
            max,
        })
    }
}

/// Check each argument against the matching parameter of `spec`.
pub fn validate_args(spec: &CommandSpec, args: &[i64]) -> Result<(), RangeError> {
    for (param, &value) in spec.params.iter().zip(args) {
        validate(value, param.min, param.max).map_err(|e| RangeError {
            name: param.name,
            ..e
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CommandKind, COMMAND_TABLE};

    #[test]
    fn bounds_are_closed_open() {
        assert!(validate(0, 0, 10).is_ok());
        assert!(validate(9, 0, 10).is_ok());
        assert!(validate(-1, 0, 10).is_err());
        assert!(validate(10, 0, 10).is_err());
    }

    #[test]
    fn every_param_accepts_edges_and_rejects_neighbours() {
        for spec in COMMAND_TABLE {
            for (i, param) in spec.params.iter().enumerate() {
                let mut args: Vec<i64> = spec.params.iter().map(|p| p.min).collect();
                for ok in [param.min, param.max - 1] {
                    args[i] = ok;
                    assert!(validate_args(spec, &args).is_ok(), "{:?} {ok}", spec.kind);
                }
                for bad in [param.min - 1, param.max] {
                    args[i] = bad;
                    let err = validate_args(spec, &args).unwrap_err();
                    assert_eq!(err.name, param.name);
                    assert_eq!(err.value, bad);
                }
            }
        }
    }

    #[test]
    fn error_names_the_offending_argument() {
        let err = validate_args(CommandKind::Write.spec(), &[3, 256]).unwrap_err();
        assert_eq!(
            err,
            RangeError {
                name: "data",
                value: 256,
                min: 0,
                max: 256
            }
        );
        assert_eq!(err.to_string(), "data must be in [0, 256), got 256");
    }
}
