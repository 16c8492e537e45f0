/*!
Coarse value classification. Every decoded json value maps to exactly one
TypeKind, and the kind names are the keys of the `types` tally in the profile.
*/

/// The coarse type buckets. Ord so it can key a BTreeMap, and the serialized
/// name is the lowercase variant name.
#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
  Null,
  Bool,
  Int,
  Float,
  String,
  List,
  Object,
  Other,
}

impl TypeKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      TypeKind::Null => "null",
      TypeKind::Bool => "bool",
      TypeKind::Int => "int",
      TypeKind::Float => "float",
      TypeKind::String => "string",
      TypeKind::List => "list",
      TypeKind::Object => "object",
      TypeKind::Other => "other",
    }
  }
}

impl std::fmt::Display for TypeKind {
  fn fmt(&self, f : &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
    write!(f, "{}", self.as_str())
  }
}

/// Classify one decoded value. Bool is matched before the numeric cases, so a
/// boolean can never land in the int bucket even if the decoder treats bools
/// as a numeric subtype. Total - there is no error case.
pub fn classify(value : &serde_json::Value) -> TypeKind {
  use serde_json::Value;
  match value {
    Value::Null => TypeKind::Null,
    Value::Bool(_) => TypeKind::Bool,
    Value::Number(n) if n.is_i64() || n.is_u64() => TypeKind::Int,
    Value::Number(n) if n.is_f64() => TypeKind::Float,
    // a Number that fits neither machine representation, eg arbitrary precision
    Value::Number(_) => TypeKind::Other,
    Value::String(_) => TypeKind::String,
    Value::Array(_) => TypeKind::List,
    Value::Object(_) => TypeKind::Object,
  }
}
