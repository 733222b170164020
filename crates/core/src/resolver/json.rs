//! Tolerant JSON traversal.

use serde_json::Value;

/// A possibly-missing position inside a JSON document.
///
/// Every step yields another lookup; reading a value that is missing, null
/// or of the wrong type returns the neutral default instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct JsonLookup<'a>(Option<&'a Value>);

impl<'a> JsonLookup<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(Some(value)).non_null()
    }

    /// A lookup pointing at nothing.
    pub fn missing() -> Self {
        Self(None)
    }

    fn non_null(self) -> Self {
        Self(self.0.filter(|v| !v.is_null()))
    }

    /// Member `key` of an object.
    pub fn get(self, key: &str) -> Self {
        Self(self.0.and_then(|v| v.as_object()).and_then(|o| o.get(key))).non_null()
    }

    /// Element `index` of an array.
    pub fn at(self, index: usize) -> Self {
        Self(self.0.and_then(|v| v.as_array()).and_then(|a| a.get(index))).non_null()
    }

    /// Follow a chain of object members.
    pub fn path(self, keys: &[&str]) -> Self {
        keys.iter().fold(self, |lookup, key| lookup.get(key))
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// This position, if it holds an object.
    pub fn object(self) -> Option<Self> {
        self.0.filter(|v| v.is_object()).map(|_| self)
    }

    /// String value; numbers and booleans are rendered, anything else is empty.
    pub fn string(self) -> String {
        match self.0 {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Integer value; floats are truncated and numeric strings parsed.
    pub fn i64(self) -> i64 {
        match self.0 {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Floating point value; numeric strings are parsed.
    pub fn f64(self) -> f64 {
        match self.0 {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Elements of an array; empty for anything else.
    pub fn items(self) -> Vec<JsonLookup<'a>> {
        match self.0 {
            Some(Value::Array(items)) => items.iter().map(|v| Self(Some(v)).non_null()).collect(),
            _ => Vec::new(),
        }
    }

    /// Elements of an array rendered with [`JsonLookup::string`].
    pub fn strings(self) -> Vec<String> {
        self.items().into_iter().map(JsonLookup::string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_members_yield_defaults() {
        let value = json!({ "a": { "b": null } });
        let root = JsonLookup::new(&value);

        assert_eq!(root.path(&["a", "b", "c"]).string(), "");
        assert_eq!(root.get("x").i64(), 0);
        assert_eq!(root.get("x").f64(), 0.0);
        assert!(root.get("x").items().is_empty());
        assert!(!root.path(&["a", "b"]).is_present());
        assert!(root.get("a").object().is_some());
    }

    #[test]
    fn test_wrong_types_yield_defaults() {
        let value = json!({ "list": "not a list", "obj": [1, 2], "n": [] });
        let root = JsonLookup::new(&value);

        assert!(root.get("list").items().is_empty());
        assert!(root.get("obj").object().is_none());
        assert_eq!(root.get("obj").get("key").string(), "");
        assert_eq!(root.get("list").at(0).string(), "");
        assert_eq!(root.get("n").i64(), 0);
    }

    #[test]
    fn test_scalar_coercions() {
        let value = json!({ "s": "8", "f": 2.0, "i": 1500, "t": true, "d": "150.5" });
        let root = JsonLookup::new(&value);

        assert_eq!(root.get("s").i64(), 8);
        assert_eq!(root.get("f").i64(), 2);
        assert_eq!(root.get("i").string(), "1500");
        assert_eq!(root.get("t").string(), "true");
        assert_eq!(root.get("d").f64(), 150.5);
    }

    #[test]
    fn test_arrays() {
        let value = json!({ "phones": ["+7 111", null, 42] });
        let root = JsonLookup::new(&value);

        assert_eq!(root.get("phones").strings(), vec!["+7 111", "", "42"]);
        assert_eq!(root.get("phones").at(0).string(), "+7 111");
        assert!(!root.get("phones").at(5).is_present());
        assert_eq!(root.path(&["phones"]).string(), "");
    }

    #[test]
    fn test_null_root_is_missing() {
        let value = Value::Null;
        assert!(!JsonLookup::new(&value).is_present());
        assert!(!JsonLookup::missing().is_present());
    }
}
