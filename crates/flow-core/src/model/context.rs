use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contexto de ejecución entregado a `Step::execute`.
///
/// Bolsa clave/valor mutable, propiedad del llamador durante un `run()`. Es
/// el único canal de comunicación entre steps; el engine nunca inspecciona
/// su contenido. Conserva el orden de inserción.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionContext {
    values: IndexMap<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta un valor y devuelve el anterior si existía.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Inserta cualquier valor serializable.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) -> Result<Option<Value>, serde_json::Error> {
        let value = serde_json::to_value(value)?;
        Ok(self.values.insert(key.into(), value))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values.get_mut(key)
    }

    /// Decodifica el valor de `key` a un tipo concreto. `Ok(None)` si la
    /// clave no existe.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.values
            .get(key)
            .map(|v| T::deserialize(v))
            .transpose()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Snapshot JSON (objeto) del contexto.
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl From<serde_json::Map<String, Value>> for ExecutionContext {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self { values: map.into_iter().collect() }
    }
}

impl FromIterator<(String, Value)> for ExecutionContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Order {
        id: u32,
        total: f64,
    }

    #[test]
    fn insert_get_and_overwrite() {
        let mut ctx = ExecutionContext::new();
        assert!(ctx.insert("data_valid", true).is_none());
        assert_eq!(ctx.get_bool("data_valid"), Some(true));
        let prev = ctx.insert("data_valid", false);
        assert_eq!(prev, Some(json!(true)));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn typed_set_and_get() {
        let mut ctx = ExecutionContext::new();
        ctx.set("order", &Order { id: 7, total: 12.5 }).unwrap();
        let order: Option<Order> = ctx.get_as("order").unwrap();
        assert_eq!(order, Some(Order { id: 7, total: 12.5 }));
        assert!(ctx.get_as::<Order>("missing").unwrap().is_none());

        ctx.insert("broken", "not an order");
        assert!(ctx.get_as::<Order>("broken").is_err());
    }

    #[test]
    fn keeps_insertion_order_and_loads_from_json() {
        let map = json!({"b": 1, "a": "x"});
        let ctx: ExecutionContext = serde_json::from_value(map).unwrap();
        assert_eq!(ctx.get_i64("b"), Some(1));
        assert_eq!(ctx.get_str("a"), Some("x"));

        let mut ordered = ExecutionContext::new();
        ordered.insert("z", 1);
        ordered.insert("y", 2);
        ordered.insert("x", 3);
        ordered.remove("y");
        assert_eq!(ordered.keys().collect::<Vec<_>>(), vec!["z", "x"]);
        assert_eq!(ordered.to_json(), json!({"z": 1, "x": 3}));
    }
}
