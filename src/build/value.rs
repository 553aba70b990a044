use crate::node::NodeBox;

/// A script value as handed over by the evaluator.
///
/// `Call` is a constructor application that has not been evaluated yet;
/// `Env::eval` replaces it with the boxed node it builds.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Num(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Box(NodeBox),
    Call(String, Box<Value>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn call(name: impl Into<String>, arg: Value) -> Self {
        Value::Call(name.into(), Box::new(arg))
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Num(_) => "Num",
            Value::Str(_) => "Str",
            Value::Tuple(_) => "Tuple",
            Value::List(_) => "List",
            Value::Box(boxed) => boxed.kind().name(),
            Value::Call(..) => "Call",
        }
    }
}

impl From<f64> for Value {
    fn from(num: f64) -> Self {
        Value::Num(num)
    }
}

impl From<i32> for Value {
    fn from(num: i32) -> Self {
        Value::Num(num as f64)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<NodeBox> for Value {
    fn from(boxed: NodeBox) -> Self {
        Value::Box(boxed)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::Tuple(vec![a.into(), b.into(), c.into()])
    }
}
