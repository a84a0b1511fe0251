use crate::semantics::*;

/// Whether `a` can act as `b`. Reference subtyping follows the class
/// hierarchy; arrows are contravariant in their parameters and covariant in
/// their result; the only base widening is `Boolean <: Integer`.
pub fn is_subtype(hierarchy: &ClassHierarchy, a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Empty, Type::Reference(_)) => true,
        (Type::Reference(sub), Type::Reference(super_)) => {
            sub == super_ || hierarchy.is_ancestor(super_, sub)
        }
        (Type::Arrow(sub), Type::Arrow(super_)) => {
            sub.parameters.len() == super_.parameters.len()
                && super_
                    .parameters
                    .iter()
                    .zip(sub.parameters.iter())
                    .all(|(wide, narrow)| is_subtype(hierarchy, wide, narrow))
                && is_subtype(hierarchy, &sub.result, &super_.result)
        }
        (Type::Integer, Type::Integer) => true,
        (Type::Boolean, Type::Boolean) => true,
        (Type::Empty, Type::Empty) => true,
        (Type::Boolean, Type::Integer) => true,
        _ => false,
    }
}

/// The most specific type both operands are subtypes of, used to give one
/// static type to branching constructs. `None` means the operands are
/// incompatible.
pub fn lowest_common_ancestor(hierarchy: &ClassHierarchy, a: &Type, b: &Type) -> Option<Type> {
    match (a, b) {
        (Type::Empty, other) | (other, Type::Empty) => Some(other.clone()),
        (Type::Reference(sub), Type::Reference(_)) => {
            let mut candidate = Some(sub.as_str());
            while let Some(class) = candidate {
                let class_type = Type::Reference(class.into());
                if is_subtype(hierarchy, b, &class_type) {
                    return Some(class_type);
                }
                candidate = hierarchy.superclass_of(class);
            }
            None
        }
        (Type::Integer, Type::Integer)
        | (Type::Integer, Type::Boolean)
        | (Type::Boolean, Type::Integer) => Some(Type::Integer),
        (Type::Boolean, Type::Boolean) => Some(Type::Boolean),
        _ => None,
    }
}
