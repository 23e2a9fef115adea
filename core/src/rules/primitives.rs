//! Type rules for literal fields. They skip undefined values and coerce
//! compatible representations through `mutate`.

use serde_json::{Number, Value, json};

use super::{CompiledRule, Rule, RuleContext, ensure_subtype};
use crate::errors::BuildError;

/// Value must be a string. `{"trim": true}` trims it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringRule;

impl StringRule {
    pub const NAME: &'static str = "string";
    const MESSAGE: &'static str = "string validation failed";
}

impl Rule for StringRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile(
        &self,
        subtype: Option<&str>,
        _is_array_member: bool,
        args: &[Value],
    ) -> Result<CompiledRule, BuildError> {
        ensure_subtype(Self::NAME, subtype, &["string"])?;

        let trim = match args.first() {
            None | Some(Value::Null) => false,
            Some(Value::Object(options)) => match options.get("trim") {
                None => false,
                Some(Value::Bool(trim)) => *trim,
                Some(_) => {
                    return Err(BuildError::invalid_arguments(
                        Self::NAME,
                        "expects \"trim\" to be a boolean",
                    ));
                }
            },
            Some(_) => {
                return Err(BuildError::invalid_arguments(
                    Self::NAME,
                    "expects options to be an object",
                ));
            }
        };

        Ok(CompiledRule::new(Self::NAME).with_options(json!({ "trim": trim })))
    }

    fn validate(&self, value: Option<&Value>, options: &Value, ctx: &mut RuleContext<'_>) {
        let Some(Value::String(s)) = value else {
            ctx.report(Self::NAME, Self::MESSAGE);
            return;
        };

        if options.get("trim") == Some(&Value::Bool(true)) {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                ctx.mutate(Value::String(trimmed.to_string()));
            }
        }
    }
}

/// Value must be a number. Numeric strings are cast.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberRule;

impl NumberRule {
    pub const NAME: &'static str = "number";
    const MESSAGE: &'static str = "number validation failed";
}

fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(int) = s.parse::<i64>() {
        return Some(Number::from(int));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

impl Rule for NumberRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile(
        &self,
        subtype: Option<&str>,
        _is_array_member: bool,
        _args: &[Value],
    ) -> Result<CompiledRule, BuildError> {
        ensure_subtype(Self::NAME, subtype, &["number"])?;
        Ok(CompiledRule::new(Self::NAME))
    }

    fn validate(&self, value: Option<&Value>, _options: &Value, ctx: &mut RuleContext<'_>) {
        match value {
            Some(Value::Number(_)) => {}
            Some(Value::String(s)) => match parse_number(s) {
                Some(number) => ctx.mutate(Value::Number(number)),
                None => ctx.report(Self::NAME, Self::MESSAGE),
            },
            _ => ctx.report(Self::NAME, Self::MESSAGE),
        }
    }
}

/// Value must be a boolean. `"true"`, `"1"`, `1` and their false
/// counterparts are cast.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanRule;

impl BooleanRule {
    pub const NAME: &'static str = "boolean";
    const MESSAGE: &'static str = "boolean validation failed";
}

fn cast_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl Rule for BooleanRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile(
        &self,
        subtype: Option<&str>,
        _is_array_member: bool,
        _args: &[Value],
    ) -> Result<CompiledRule, BuildError> {
        ensure_subtype(Self::NAME, subtype, &["boolean"])?;
        Ok(CompiledRule::new(Self::NAME))
    }

    fn validate(&self, value: Option<&Value>, _options: &Value, ctx: &mut RuleContext<'_>) {
        match value {
            Some(Value::Bool(_)) => {}
            Some(other) => match cast_boolean(other) {
                Some(b) => ctx.mutate(Value::Bool(b)),
                None => ctx.report(Self::NAME, Self::MESSAGE),
            },
            None => ctx.report(Self::NAME, Self::MESSAGE),
        }
    }
}
