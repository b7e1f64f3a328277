//! Declarative field constraints and the validator that enforces them

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use easel_imaging::mask::{MAX_FEATHER, MAX_SIDE};
use easel_imaging::{ImageRef, MaskShape, MaskSpec};
use rand::Rng;
use serde_json::{Map, Value, json};

/// Constraint attached to one input field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text { min_len: usize, max_len: usize },
    Integer { min: i64, max: i64, multiple_of: i64, default: Option<i64> },
    /// Integer whose unset value is drawn at random from `0..=max`
    Seed { max: u64 },
    Float { min: f64, max: f64, default: Option<f64> },
    Choice { options: &'static [&'static str], default: Option<&'static str> },
    /// File path or base64 image data
    Image,
    /// List of `#RRGGBB` strings
    Colors { max_items: usize },
    /// Mask image, or a shape object synthesized at the target's size
    Mask,
}

impl FieldKind {
    /// Human-readable constraint
    pub fn constraint(&self) -> String {
        match *self {
            Self::Text { min_len, max_len } => format!("length {min_len}-{max_len}"),
            Self::Integer { min, max, multiple_of, .. } if multiple_of > 1 => {
                format!("integer {min}-{max}, divisible by {multiple_of}")
            }
            Self::Integer { min, max, .. } => format!("integer {min}-{max}"),
            Self::Seed { max } => format!("integer 0-{max}"),
            Self::Float { min, max, .. } => format!("number {min:.1}-{max:.1}"),
            Self::Choice { options, .. } => format!("one of {}", options.join(", ")),
            Self::Image => "existing file path or base64 image data".to_string(),
            Self::Colors { max_items } => format!("1-{max_items} hex colors like #FF9800"),
            Self::Mask => "mask image (file path or base64) or a shape object".to_string(),
        }
    }
}

/// One declared input field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Synonyms accepted on input
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            aliases: &[],
            kind,
            required: false,
            description: "",
        }
    }

    pub const fn text(name: &'static str, min_len: usize, max_len: usize) -> Self {
        Self::new(name, FieldKind::Text { min_len, max_len })
    }

    pub const fn integer(name: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self::new(
            name,
            FieldKind::Integer {
                min,
                max,
                multiple_of: 1,
                default: Some(default),
            },
        )
    }

    /// Integer with no default; pair with `required`
    pub const fn integer_unset(name: &'static str, min: i64, max: i64) -> Self {
        Self::new(
            name,
            FieldKind::Integer {
                min,
                max,
                multiple_of: 1,
                default: None,
            },
        )
    }

    pub const fn seed(max: u64) -> Self {
        Self::new("seed", FieldKind::Seed { max })
    }

    pub const fn float(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self::new(
            name,
            FieldKind::Float {
                min,
                max,
                default: Some(default),
            },
        )
    }

    /// Float with no default; pair with `required`
    pub const fn float_unset(name: &'static str, min: f64, max: f64) -> Self {
        Self::new(name, FieldKind::Float { min, max, default: None })
    }

    pub const fn choice(name: &'static str, options: &'static [&'static str], default: Option<&'static str>) -> Self {
        Self::new(name, FieldKind::Choice { options, default })
    }

    pub const fn image(name: &'static str) -> Self {
        Self::new(name, FieldKind::Image).required()
    }

    pub const fn mask(name: &'static str) -> Self {
        Self::new(name, FieldKind::Mask).required()
    }

    pub const fn colors(max_items: usize) -> Self {
        Self::new("colors", FieldKind::Colors { max_items }).required()
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub const fn step(mut self, multiple_of: i64) -> Self {
        if let FieldKind::Integer { min, max, default, .. } = self.kind {
            self.kind = FieldKind::Integer {
                min,
                max,
                multiple_of,
                default,
            };
        }
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Every key this field may arrive under, canonical name first
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    /// JSON Schema fragment for one input key
    pub fn json_schema(&self) -> Value {
        let description = if self.description.is_empty() {
            self.kind.constraint()
        } else {
            format!("{} ({})", self.description, self.kind.constraint())
        };

        let mut schema = match self.kind {
            FieldKind::Text { min_len, max_len } => {
                json!({ "type": "string", "minLength": min_len, "maxLength": max_len })
            }
            FieldKind::Integer {
                min,
                max,
                multiple_of,
                default,
            } => {
                let mut schema = json!({ "type": "integer", "minimum": min, "maximum": max });
                if multiple_of > 1 {
                    schema["multipleOf"] = json!(multiple_of);
                }
                if let Some(default) = default {
                    schema["default"] = json!(default);
                }
                schema
            }
            FieldKind::Seed { max } => json!({ "type": "integer", "minimum": 0, "maximum": max }),
            FieldKind::Float { min, max, default } => {
                let mut schema = json!({ "type": "number", "minimum": min, "maximum": max });
                if let Some(default) = default {
                    schema["default"] = json!(default);
                }
                schema
            }
            FieldKind::Choice { options, default } => {
                let mut schema = json!({ "type": "string", "enum": options });
                if let Some(default) = default {
                    schema["default"] = json!(default);
                }
                schema
            }
            FieldKind::Image => json!({ "type": "string" }),
            FieldKind::Mask => json!({
                "type": ["string", "object"],
                "properties": {
                    "shape": { "type": "string", "enum": ["rectangle", "ellipse", "full"] },
                    "x": { "type": "integer" },
                    "y": { "type": "integer" },
                    "width": { "type": "integer" },
                    "height": { "type": "integer" },
                    "center_x": { "type": "integer" },
                    "center_y": { "type": "integer" },
                    "radius_x": { "type": "integer" },
                    "radius_y": { "type": "integer" },
                    "feather": { "type": "integer", "minimum": 0, "maximum": 50 },
                },
            }),
            FieldKind::Colors { max_items } => json!({
                "type": "array",
                "items": { "type": "string", "pattern": "^#[0-9A-Fa-f]{6}$" },
                "minItems": 1,
                "maxItems": max_items,
            }),
        };

        schema["description"] = json!(description);
        schema
    }

    fn lookup<'a>(&self, args: &'a Map<String, Value>) -> Option<(&'static str, &'a Value)> {
        self.keys()
            .find_map(|key| args.get(key).filter(|value| !value.is_null()).map(|value| (key, value)))
    }

    fn default_value(&self) -> Option<FieldValue> {
        match self.kind {
            FieldKind::Integer { default, .. } => default.map(FieldValue::Integer),
            FieldKind::Float { default, .. } => default.map(FieldValue::Float),
            FieldKind::Choice { default, .. } => default.map(FieldValue::Choice),
            FieldKind::Seed { max } => Some(FieldValue::Seed(rand::rng().random_range(0..=max))),
            FieldKind::Text { .. } | FieldKind::Image | FieldKind::Mask | FieldKind::Colors { .. } => None,
        }
    }

    fn check(&self, key: &'static str, value: &Value) -> Result<FieldValue, Vec<Violation>> {
        let reject = || vec![Violation::new(key, self.kind.constraint(), value)];

        match self.kind {
            FieldKind::Text { min_len, max_len } => {
                let text = value.as_str().ok_or_else(reject)?;
                let len = text.chars().count();
                if len < min_len || len > max_len {
                    return Err(reject());
                }
                Ok(FieldValue::Text(text.to_owned()))
            }
            FieldKind::Integer {
                min,
                max,
                multiple_of,
                ..
            } => {
                let number = value.as_i64().ok_or_else(reject)?;
                if number < min || number > max || number % multiple_of != 0 {
                    return Err(reject());
                }
                Ok(FieldValue::Integer(number))
            }
            FieldKind::Seed { max } => {
                let seed = value.as_u64().filter(|seed| *seed <= max).ok_or_else(reject)?;
                Ok(FieldValue::Seed(seed))
            }
            FieldKind::Float { min, max, .. } => {
                let number = value.as_f64().filter(|n| (min..=max).contains(n)).ok_or_else(reject)?;
                Ok(FieldValue::Float(number))
            }
            FieldKind::Choice { options, .. } => {
                let choice = value
                    .as_str()
                    .and_then(|s| options.iter().copied().find(|option| *option == s))
                    .ok_or_else(reject)?;
                Ok(FieldValue::Choice(choice))
            }
            FieldKind::Image => {
                let reference = value.as_str().and_then(|s| ImageRef::parse(s).ok()).ok_or_else(reject)?;
                Ok(FieldValue::Image(reference))
            }
            FieldKind::Colors { max_items } => check_colors(key, value, max_items).map(FieldValue::Colors),
            FieldKind::Mask => match value {
                Value::Object(shape) => check_mask_shape(key, shape).map(|s| FieldValue::Mask(MaskSpec::Generated(s))),
                _ => {
                    let reference = value.as_str().and_then(|s| ImageRef::parse(s).ok()).ok_or_else(reject)?;
                    Ok(FieldValue::Mask(MaskSpec::Supplied(reference)))
                }
            },
        }
    }
}

fn check_mask_shape(key: &'static str, shape: &Map<String, Value>) -> Result<MaskShape, Vec<Violation>> {
    let mut violations = Vec::new();
    let mut int = |name: &str, default: Option<i64>| -> i64 {
        let max = if name == "feather" { MAX_FEATHER } else { MAX_SIDE };
        match shape.get(name) {
            Some(value) => match value.as_i64() {
                Some(n) if (0..=max).contains(&n) => n,
                _ => {
                    violations.push(Violation::new(format!("{key}.{name}"), format!("integer 0-{max}"), value));
                    0
                }
            },
            None => default.unwrap_or_else(|| {
                violations.push(Violation {
                    field: format!("{key}.{name}"),
                    constraint: "required".to_string(),
                    value: "missing".to_string(),
                });
                0
            }),
        }
    };

    let parsed = match shape.get("shape").and_then(Value::as_str) {
        Some("rectangle") => Some(MaskShape::Rectangle {
            x: int("x", None),
            y: int("y", None),
            width: int("width", None),
            height: int("height", None),
            feather: int("feather", Some(0)),
        }),
        Some("ellipse") => Some(MaskShape::Ellipse {
            center_x: int("center_x", None),
            center_y: int("center_y", None),
            radius_x: int("radius_x", None),
            radius_y: int("radius_y", None),
            feather: int("feather", Some(0)),
        }),
        Some("full") => Some(MaskShape::Full),
        _ => None,
    };

    match parsed {
        Some(shape) if violations.is_empty() => Ok(shape),
        Some(_) => Err(violations),
        None => Err(vec![Violation::new(
            format!("{key}.shape"),
            "one of rectangle, ellipse, full".to_string(),
            shape.get("shape").unwrap_or(&Value::Null),
        )]),
    }
}

fn check_colors(key: &'static str, value: &Value, max_items: usize) -> Result<Vec<String>, Vec<Violation>> {
    let constraint = format!("1-{max_items} hex colors like #FF9800");
    let items = value
        .as_array()
        .filter(|items| (1..=max_items).contains(&items.len()))
        .ok_or_else(|| vec![Violation::new(key, constraint, value)])?;

    let mut colors = Vec::with_capacity(items.len());
    let mut violations = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match item.as_str().filter(|s| is_hex_color(s)) {
            Some(color) => colors.push(color.to_owned()),
            None => violations.push(Violation::new(
                format!("{key}[{index}]"),
                "hex color like #FF9800".to_string(),
                item,
            )),
        }
    }

    if violations.is_empty() { Ok(colors) } else { Err(violations) }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// One field that failed its constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Key as supplied by the caller, with an index for list items
    pub field: String,
    pub constraint: String,
    /// Short rendering of the offending value
    pub value: String,
}

impl Violation {
    fn new(field: impl Into<String>, constraint: String, value: &Value) -> Self {
        Self {
            field: field.into(),
            constraint,
            value: summarize(value),
        }
    }

    fn missing(spec: &FieldSpec) -> Self {
        let field = spec.keys().collect::<Vec<_>>().join(" or ");
        Self {
            field,
            constraint: "required".to_string(),
            value: "missing".to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (got {})", self.field, self.constraint, self.value)
    }
}

fn summarize(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 40 => format!("string of {} chars", s.chars().count()),
        Value::String(s) => format!("{s:?}"),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(_) => "object".to_string(),
        other => other.to_string(),
    }
}

/// Every field violation found in one set of arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid parameters: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
enum FieldValue {
    Text(String),
    Integer(i64),
    Seed(u64),
    Float(f64),
    Choice(&'static str),
    Image(ImageRef),
    Mask(MaskSpec),
    Colors(Vec<String>),
}

/// Validated values keyed by canonical field name
#[derive(Debug, Default)]
pub(crate) struct Fields {
    values: HashMap<&'static str, FieldValue>,
}

impl Fields {
    pub(crate) fn text(&mut self, name: &'static str) -> Result<String, ValidationError> {
        match self.values.remove(name) {
            Some(FieldValue::Text(text)) => Ok(text),
            _ => Err(absent(name)),
        }
    }

    pub(crate) fn optional_text(&mut self, name: &'static str) -> Option<String> {
        match self.values.remove(name) {
            Some(FieldValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub(crate) fn integer<T: TryFrom<i64>>(&mut self, name: &'static str) -> Result<T, ValidationError> {
        match self.values.remove(name) {
            Some(FieldValue::Integer(number)) => T::try_from(number).map_err(|_| absent(name)),
            _ => Err(absent(name)),
        }
    }

    pub(crate) fn seed(&mut self) -> Result<u64, ValidationError> {
        match self.values.remove("seed") {
            Some(FieldValue::Seed(seed)) => Ok(seed),
            _ => Err(absent("seed")),
        }
    }

    pub(crate) fn float(&mut self, name: &'static str) -> Result<f64, ValidationError> {
        match self.values.remove(name) {
            Some(FieldValue::Float(number)) => Ok(number),
            _ => Err(absent(name)),
        }
    }

    pub(crate) fn choice<T: FromStr>(&mut self, name: &'static str) -> Result<T, ValidationError> {
        self.optional_choice(name)?.ok_or_else(|| absent(name))
    }

    pub(crate) fn optional_choice<T: FromStr>(&mut self, name: &'static str) -> Result<Option<T>, ValidationError> {
        match self.values.remove(name) {
            Some(FieldValue::Choice(choice)) => T::from_str(choice).map(Some).map_err(|_| absent(name)),
            _ => Ok(None),
        }
    }

    pub(crate) fn image(&mut self, name: &'static str) -> Result<ImageRef, ValidationError> {
        match self.values.remove(name) {
            Some(FieldValue::Image(reference)) => Ok(reference),
            _ => Err(absent(name)),
        }
    }

    pub(crate) fn mask(&mut self, name: &'static str) -> Result<MaskSpec, ValidationError> {
        match self.values.remove(name) {
            Some(FieldValue::Mask(spec)) => Ok(spec),
            _ => Err(absent(name)),
        }
    }

    pub(crate) fn colors(&mut self) -> Result<Vec<String>, ValidationError> {
        match self.values.remove("colors") {
            Some(FieldValue::Colors(colors)) => Ok(colors),
            _ => Err(absent("colors")),
        }
    }
}

// Reached only if a typed constructor asks for a field its table does not declare
fn absent(name: &'static str) -> ValidationError {
    ValidationError {
        violations: vec![Violation {
            field: name.to_string(),
            constraint: "required".to_string(),
            value: "missing".to_string(),
        }],
    }
}

/// Check arguments against a field table, collecting every violation
///
/// Aliases are folded into the canonical name, unset optional fields take
/// their defaults, and an unset seed is drawn at random. Keys outside the
/// table are ignored.
pub(crate) fn validate(specs: &[FieldSpec], args: &Map<String, Value>) -> Result<Fields, ValidationError> {
    let mut fields = Fields::default();
    let mut violations = Vec::new();

    for spec in specs {
        match spec.lookup(args) {
            Some((key, value)) => match spec.check(key, value) {
                Ok(checked) => {
                    fields.values.insert(spec.name, checked);
                }
                Err(found) => violations.extend(found),
            },
            None => match spec.default_value() {
                Some(default) => {
                    fields.values.insert(spec.name, default);
                }
                None if spec.required => violations.push(Violation::missing(spec)),
                None => {}
            },
        }
    }

    if violations.is_empty() {
        Ok(fields)
    } else {
        Err(ValidationError { violations })
    }
}
