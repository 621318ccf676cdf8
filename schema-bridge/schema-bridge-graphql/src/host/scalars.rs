use std::sync::Arc;

use fnv::FnvHashMap;

use crate::{
    descriptor::{BuiltinScalar, Origin, ScalarDef},
    resolver::ScalarFn,
    value::Value,
};

pub type ScalarRegistry = FnvHashMap<BuiltinScalar, Arc<ScalarDef>>;

/// The scalars every schema may refer to, keyed by their builtin identity.
pub fn default_scalar_registry() -> ScalarRegistry {
    let mut registry = ScalarRegistry::default();
    for scalar in [
        BuiltinScalar::String,
        BuiltinScalar::Int,
        BuiltinScalar::Float,
        BuiltinScalar::Boolean,
        BuiltinScalar::ID,
    ] {
        registry.insert(scalar, Arc::new(ScalarDef::builtin(Origin::Declared, scalar)));
    }
    registry.insert(BuiltinScalar::Decimal, Arc::new(decimal()));
    registry
}

fn decimal() -> ScalarDef {
    let serialize: ScalarFn = Arc::new(|value| match value {
        Value::String(string) => Ok(Value::String(string.clone())),
        Value::Int(int) => Ok(Value::String(int.to_string())),
        Value::Float(float) => Ok(Value::String(float.to_string())),
        other => Err(format!("Decimal cannot represent value: {other}").into()),
    });
    let parse_value: ScalarFn = Arc::new(|value| match value {
        Value::String(string) if string.trim().parse::<f64>().is_ok() => {
            Ok(Value::String(string.trim().to_string()))
        }
        Value::Int(int) => Ok(Value::String(int.to_string())),
        Value::Float(float) => Ok(Value::String(float.to_string())),
        other => Err(format!("Decimal cannot represent value: {other}").into()),
    });

    ScalarDef {
        description: Some("Decimal (fixed-point)".into()),
        serialize: Some(serialize),
        parse_value: Some(parse_value),
        ..ScalarDef::builtin(Origin::Declared, BuiltinScalar::Decimal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_is_serialized_as_string() {
        let registry = default_scalar_registry();
        let decimal = &registry[&BuiltinScalar::Decimal];
        let serialize = decimal.serialize.as_ref().unwrap();
        let parse_value = decimal.parse_value.as_ref().unwrap();

        assert_eq!(serialize(&Value::from("3.14")), Ok(Value::from("3.14")));
        assert_eq!(serialize(&Value::Int(3)), Ok(Value::from("3")));
        assert_eq!(parse_value(&Value::from(" 1.5 ")), Ok(Value::from("1.5")));
        assert!(parse_value(&Value::from("pi")).is_err());
        assert_eq!(decimal.description.as_deref(), Some("Decimal (fixed-point)"));
    }
}
