//! The closed function registry (spec §4.1).

use crate::value::InferredType;

#[derive(Debug, Clone, Copy)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub min_args: usize,
    /// `None` means unbounded (variadic).
    pub max_args: Option<usize>,
    /// `None` means the function accepts any argument type (`is_empty`).
    pub arg_type: Option<InferredType>,
    pub return_type: InferredType,
}

const REGISTRY: &[FunctionSignature] = &[
    FunctionSignature { name: "abs", min_args: 1, max_args: Some(1), arg_type: Some(InferredType::Number), return_type: InferredType::Number },
    FunctionSignature { name: "min", min_args: 2, max_args: None, arg_type: Some(InferredType::Number), return_type: InferredType::Number },
    FunctionSignature { name: "max", min_args: 2, max_args: None, arg_type: Some(InferredType::Number), return_type: InferredType::Number },
    FunctionSignature { name: "sum", min_args: 1, max_args: None, arg_type: Some(InferredType::Number), return_type: InferredType::Number },
    FunctionSignature { name: "round", min_args: 1, max_args: Some(1), arg_type: Some(InferredType::Number), return_type: InferredType::Number },
    FunctionSignature { name: "floor", min_args: 1, max_args: Some(1), arg_type: Some(InferredType::Number), return_type: InferredType::Number },
    FunctionSignature { name: "ceil", min_args: 1, max_args: Some(1), arg_type: Some(InferredType::Number), return_type: InferredType::Number },
    FunctionSignature { name: "upper", min_args: 1, max_args: Some(1), arg_type: Some(InferredType::Text), return_type: InferredType::Text },
    FunctionSignature { name: "lower", min_args: 1, max_args: Some(1), arg_type: Some(InferredType::Text), return_type: InferredType::Text },
    FunctionSignature { name: "trim", min_args: 1, max_args: Some(1), arg_type: Some(InferredType::Text), return_type: InferredType::Text },
    FunctionSignature { name: "concat", min_args: 1, max_args: None, arg_type: Some(InferredType::Text), return_type: InferredType::Text },
    FunctionSignature { name: "length", min_args: 1, max_args: Some(1), arg_type: Some(InferredType::Text), return_type: InferredType::Number },
    FunctionSignature { name: "is_empty", min_args: 1, max_args: Some(1), arg_type: None, return_type: InferredType::Boolean },
];

pub fn lookup(name: &str) -> Option<FunctionSignature> {
    REGISTRY.iter().copied().find(|f| f.name == name)
}
