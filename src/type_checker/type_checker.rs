use std::{collections::HashMap, fmt::Display, rc::Rc};

use lazy_static::lazy_static;

use crate::{
    ast::{
        ast::File,
        expressions::{
            ArrayLit, BasicLit, BinaryExpr, BinaryOp, CallExpr, Expr, LitKind, SubscriptExpr,
            UnaryExpr, UnaryOp,
        },
        types::Type as AstType,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    scope::{Object, ObjectKind, Scopes},
    stmt::check_file,
    types::{type_equal, Type, TypeContext, TypeRef},
    universe::universe,
};

/// Magnitude of `i64::MIN`, only valid directly under a unary minus.
const MIN_INT_MAGNITUDE: &str = "9223372036854775808";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultMode {
    Invalid,
    /// A call to a function without results.
    None,
    /// Type deferred, as for `{}`. See [`ExprResult::depth`].
    Unknown,
    Ok,
}

/// What an expression resolved to.
#[derive(Debug, Clone)]
pub struct ExprResult {
    pub mode: ResultMode,
    pub ty: Option<TypeRef>,
    /// For `Unknown` results, the number of array levels already known:
    /// 1 for `{}`, 2 for `{{}}`. 0 places no constraint.
    pub depth: usize,
}

impl ExprResult {
    pub fn ok(ty: TypeRef) -> Self {
        ExprResult {
            mode: ResultMode::Ok,
            ty: Some(ty),
            depth: 0,
        }
    }

    pub fn none() -> Self {
        ExprResult {
            mode: ResultMode::None,
            ty: None,
            depth: 0,
        }
    }

    pub fn unknown(depth: usize) -> Self {
        ExprResult {
            mode: ResultMode::Unknown,
            ty: None,
            depth,
        }
    }

    /// Whether an `Unknown` result fits `ty`, which must have at least as
    /// many array levels.
    pub fn fits(&self, ty: &Type) -> bool {
        self.is_unknown() && ty.dimensions() >= self.depth
    }

    pub fn is_unknown(&self) -> bool {
        self.mode == ResultMode::Unknown
    }

    pub fn is_int(&self) -> bool {
        self.ty.as_ref().is_some_and(|ty| ty.is_int())
    }

    pub fn is_bool(&self) -> bool {
        self.ty.as_ref().is_some_and(|ty| ty.is_bool())
    }
}

impl Display for ExprResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.mode, &self.ty) {
            (ResultMode::Ok, Some(ty)) => write!(f, "{}", ty),
            (ResultMode::Unknown, _) => {
                write!(f, "unknown{}", "[]".repeat(self.depth.saturating_sub(1)))
            }
            (ResultMode::None, _) => write!(f, "no value"),
            _ => write!(f, "invalid"),
        }
    }
}

type Predicate = fn(&Type) -> bool;

fn is_int_or_array(ty: &Type) -> bool {
    ty.is_int() || ty.is_array()
}

fn is_any(_: &Type) -> bool {
    true
}

lazy_static! {
    static ref UNARY_PREDICATES: HashMap<UnaryOp, Predicate> = {
        let mut map: HashMap<UnaryOp, Predicate> = HashMap::new();
        map.insert(UnaryOp::Neg, Type::is_int);
        map.insert(UnaryOp::Not, Type::is_bool);
        map
    };
    static ref BINARY_PREDICATES: HashMap<BinaryOp, Predicate> = {
        let mut map: HashMap<BinaryOp, Predicate> = HashMap::new();
        map.insert(BinaryOp::Add, is_int_or_array);
        for op in [
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Rem,
            BinaryOp::Lt,
            BinaryOp::Le,
            BinaryOp::Gt,
            BinaryOp::Ge,
        ] {
            map.insert(op, Type::is_int);
        }
        map.insert(BinaryOp::Eq, is_any);
        map.insert(BinaryOp::Neq, is_any);
        map.insert(BinaryOp::And, Type::is_bool);
        map.insert(BinaryOp::Or, Type::is_bool);
        map
    };
}

/// The function whose body is being checked.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub results: Vec<TypeRef>,
}

#[derive(Debug)]
pub struct TypeChecker {
    pub ctx: TypeContext,
    pub scopes: Scopes,
    pub function: Option<FunctionContext>,
    pub used_libraries: Vec<String>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    /// A checker whose scope stack holds only the universe.
    pub fn new() -> Self {
        let ctx = TypeContext::new();
        let scopes = universe(&ctx);

        TypeChecker {
            ctx,
            scopes,
            function: None,
            used_libraries: vec![],
        }
    }

    /// Resolves `name` from the innermost scope outwards.
    pub fn lookup(&self, name: &str) -> Option<&Object> {
        self.scopes.lookup_chain(self.scopes.current(), name)
    }

    /// Binds `object` in the current scope.
    pub fn declare(&mut self, object: Object) -> Result<(), Error> {
        let name = object.name.clone();
        let position = object.position;

        if self.scopes.insert(self.scopes.current(), object) {
            Ok(())
        } else {
            Err(Error::new(ErrorImpl::AlreadyDeclared { name }, position))
        }
    }

    pub fn declare_var(&mut self, name: &str, position: Position, ty: TypeRef) -> Result<(), Error> {
        self.declare(Object::new(ObjectKind::Var, name, position, ty))
    }
}

fn mismatch(expected: impl Display, found: impl Display, position: Position) -> Error {
    Error::new(
        ErrorImpl::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        },
        position,
    )
}

/// Whether a value described by `value` may be stored in a `target`.
pub fn assignable(target: &Type, value: &ExprResult) -> bool {
    match (value.mode, &value.ty) {
        (ResultMode::Unknown, _) => value.fits(target),
        (ResultMode::Ok, Some(ty)) => type_equal(target, ty),
        _ => false,
    }
}

/// Resolves a written type annotation. Array sizes must be `int`.
pub fn resolve_type(checker: &TypeChecker, ty: &AstType) -> Result<TypeRef, Error> {
    match ty {
        AstType::Primitive(primitive) => {
            let name = primitive.kind.to_string();
            match checker.lookup(&name) {
                Some(object) if object.kind == ObjectKind::TypeName => Ok(Rc::clone(&object.ty)),
                _ => Err(Error::new(ErrorImpl::NotDefined { name }, primitive.position)),
            }
        }
        AstType::Array(array) => {
            let element = resolve_type(checker, &array.element)?;
            if let Some(size) = &array.size {
                let size_result = check_value(checker, size)?;
                if !size_result.is_int() {
                    return Err(mismatch("int", size_result, size.position()));
                }
            }
            Ok(checker.ctx.array(element))
        }
    }
}

pub fn check_expr(checker: &TypeChecker, expr: &Expr) -> Result<ExprResult, Error> {
    match expr {
        Expr::Ident(ident) => match checker.lookup(&ident.name) {
            Some(object) => Ok(ExprResult::ok(Rc::clone(&object.ty))),
            None => Err(Error::new(
                ErrorImpl::NotDefined {
                    name: ident.name.clone(),
                },
                ident.position,
            )),
        },
        Expr::BasicLit(lit) => check_basic_lit(checker, lit),
        Expr::ArrayLit(lit) => check_array_lit(checker, lit),
        Expr::Call(call) => check_call(checker, call),
        Expr::Length(length) => {
            let arg = check_value(checker, &length.arg)?;
            match &arg.ty {
                _ if arg.is_unknown() => Ok(ExprResult::ok(checker.ctx.int())),
                Some(ty) if ty.is_array() => Ok(ExprResult::ok(checker.ctx.int())),
                _ => Err(Error::new(
                    ErrorImpl::NotAnArray {
                        found: arg.to_string(),
                    },
                    length.arg.position(),
                )),
            }
        }
        Expr::Subscript(subscript) => check_subscript(checker, subscript),
        Expr::Unary(unary) => check_unary(checker, unary),
        Expr::Binary(binary) => check_binary(checker, binary),
    }
}

/// Checks `expr` where exactly one value is required.
pub fn check_value(checker: &TypeChecker, expr: &Expr) -> Result<ExprResult, Error> {
    let result = check_expr(checker, expr)?;
    let name = match expr {
        Expr::Call(call) => call.func.name.clone(),
        _ => String::from("expression"),
    };
    let is_tuple = result.ty.as_ref().is_some_and(|ty| ty.is_tuple());

    match result.mode {
        ResultMode::None => Err(Error::new(ErrorImpl::NoValue { name }, expr.position())),
        ResultMode::Ok if is_tuple => {
            Err(Error::new(ErrorImpl::MultipleValues { name }, expr.position()))
        }
        ResultMode::Ok | ResultMode::Unknown => Ok(result),
        ResultMode::Invalid => Err(Error::new(
            ErrorImpl::Internal {
                message: format!("expression resolved to {}", result),
            },
            expr.position(),
        )),
    }
}

fn check_basic_lit(checker: &TypeChecker, lit: &BasicLit) -> Result<ExprResult, Error> {
    match lit.kind {
        LitKind::Integer => {
            if lit.value.parse::<i64>().is_err() {
                return Err(Error::new(
                    ErrorImpl::IntegerOutOfRange {
                        literal: lit.value.clone(),
                    },
                    lit.position,
                ));
            }
            Ok(ExprResult::ok(checker.ctx.int()))
        }
        LitKind::Char => Ok(ExprResult::ok(checker.ctx.int())),
        LitKind::Bool => Ok(ExprResult::ok(checker.ctx.bool())),
        LitKind::String => Ok(ExprResult::ok(checker.ctx.array(checker.ctx.int()))),
    }
}

fn check_array_lit(checker: &TypeChecker, lit: &ArrayLit) -> Result<ExprResult, Error> {
    let mut element: Option<TypeRef> = None;
    // Deepest `{}`-like element seen so far.
    let mut unknown: Option<ExprResult> = None;

    for expr in &lit.elements {
        let result = check_value(checker, expr)?;
        let matches = match (&element, &result.ty) {
            (Some(expected), Some(found)) => type_equal(expected, found),
            (Some(expected), None) => result.fits(expected),
            (None, Some(found)) => unknown.as_ref().map_or(true, |unknown| unknown.fits(found)),
            (None, None) => true,
        };

        if !matches {
            let expected = match (&element, &unknown) {
                (Some(expected), _) => expected.to_string(),
                (None, Some(unknown)) => unknown.to_string(),
                (None, None) => String::from("unknown"),
            };
            return Err(Error::new(
                ErrorImpl::MismatchedArrayElements {
                    expected,
                    found: result.to_string(),
                },
                expr.position(),
            ));
        }

        if let Some(found) = &result.ty {
            if element.is_none() {
                element = Some(Rc::clone(found));
            }
        } else if unknown.as_ref().map_or(true, |unknown| result.depth > unknown.depth) {
            unknown = Some(result.clone());
        }
    }

    match (element, unknown) {
        (Some(element), _) => Ok(ExprResult::ok(checker.ctx.array(element))),
        (None, Some(unknown)) => Ok(ExprResult::unknown(unknown.depth + 1)),
        (None, None) => Ok(ExprResult::unknown(1)),
    }
}

/// Checks a call. Unlike [`check_value`], a call with zero or several
/// results is accepted here.
pub fn check_call(checker: &TypeChecker, call: &CallExpr) -> Result<ExprResult, Error> {
    let name = &call.func.name;
    let Some(object) = checker.lookup(name) else {
        return Err(Error::new(
            ErrorImpl::NotDefined { name: name.clone() },
            call.func.position,
        ));
    };

    let signature = Rc::clone(&object.ty);
    let Type::Signature { params, results } = signature.as_ref() else {
        return Err(Error::new(
            ErrorImpl::NotCallable { name: name.clone() },
            call.func.position,
        ));
    };
    if !object.is_callable() {
        return Err(Error::new(
            ErrorImpl::NotCallable { name: name.clone() },
            call.func.position,
        ));
    }

    if call.args.len() != params.len() {
        return Err(Error::new(
            ErrorImpl::ArgumentCount {
                name: name.clone(),
                expected: params.len(),
                received: call.args.len(),
            },
            call.position,
        ));
    }

    for (arg, param) in call.args.iter().zip(params) {
        let result = check_value(checker, arg)?;
        if !assignable(param, &result) {
            return Err(mismatch(param, result, arg.position()));
        }
    }

    match results.as_slice() {
        [] => Ok(ExprResult::none()),
        [single] => Ok(ExprResult::ok(Rc::clone(single))),
        _ => Ok(ExprResult::ok(checker.ctx.tuple(results.clone()))),
    }
}

pub fn check_subscript(checker: &TypeChecker, subscript: &SubscriptExpr) -> Result<ExprResult, Error> {
    let index = check_value(checker, &subscript.index)?;
    if !index.is_int() {
        return Err(Error::new(
            ErrorImpl::NonIntegerSubscript {
                found: index.to_string(),
            },
            subscript.index.position(),
        ));
    }

    let array = check_value(checker, &subscript.lhs)?;
    if array.is_unknown() {
        return Ok(ExprResult::unknown(array.depth.saturating_sub(1)));
    }
    match array.ty.as_ref().and_then(|ty| ty.element()) {
        Some(element) => Ok(ExprResult::ok(Rc::clone(element))),
        None => Err(Error::new(
            ErrorImpl::NotAnArray {
                found: array.to_string(),
            },
            subscript.lhs.position(),
        )),
    }
}

fn check_unary(checker: &TypeChecker, unary: &UnaryExpr) -> Result<ExprResult, Error> {
    if let (UnaryOp::Neg, Expr::BasicLit(lit)) = (unary.op, unary.operand.as_ref()) {
        if lit.kind == LitKind::Integer && lit.value == MIN_INT_MAGNITUDE {
            return Ok(ExprResult::ok(checker.ctx.int()));
        }
    }

    let operand = check_value(checker, &unary.operand)?;
    let Some(predicate) = UNARY_PREDICATES.get(&unary.op) else {
        return Err(Error::new(
            ErrorImpl::UnknownOperator {
                operator: unary.op.to_string(),
            },
            unary.position,
        ));
    };

    match &operand.ty {
        Some(ty) if predicate(ty.as_ref()) => Ok(ExprResult::ok(Rc::clone(ty))),
        _ => Err(Error::new(
            ErrorImpl::InvalidOperand {
                operator: unary.op.to_string(),
                found: operand.to_string(),
            },
            unary.position,
        )),
    }
}

fn check_binary(checker: &TypeChecker, binary: &BinaryExpr) -> Result<ExprResult, Error> {
    let lhs = check_value(checker, &binary.lhs)?;
    let rhs = check_value(checker, &binary.rhs)?;

    let Some(predicate) = BINARY_PREDICATES.get(&binary.op) else {
        return Err(Error::new(
            ErrorImpl::UnknownOperator {
                operator: binary.op.to_string(),
            },
            binary.position,
        ));
    };

    // `{}` takes the array type of the other side.
    let ty = match (&lhs.ty, &rhs.ty) {
        (Some(left), Some(right)) => {
            if !type_equal(left, right) {
                return Err(mismatch(left, right, binary.rhs.position()));
            }
            Rc::clone(left)
        }
        (Some(known), None) => {
            if !rhs.fits(known) {
                return Err(mismatch(known, &rhs, binary.position));
            }
            Rc::clone(known)
        }
        (None, Some(known)) => {
            if !lhs.fits(known) {
                return Err(mismatch(known, &lhs, binary.position));
            }
            Rc::clone(known)
        }
        (None, None) => {
            return match binary.op {
                BinaryOp::Add => Ok(ExprResult::unknown(lhs.depth.max(rhs.depth))),
                BinaryOp::Eq | BinaryOp::Neq => Ok(ExprResult::ok(checker.ctx.bool())),
                _ => Err(Error::new(
                    ErrorImpl::InvalidOperand {
                        operator: binary.op.to_string(),
                        found: lhs.to_string(),
                    },
                    binary.position,
                )),
            };
        }
    };

    if !predicate(ty.as_ref()) {
        return Err(Error::new(
            ErrorImpl::InvalidOperand {
                operator: binary.op.to_string(),
                found: ty.to_string(),
            },
            binary.position,
        ));
    }

    match binary.op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            Ok(ExprResult::ok(ty))
        }
        _ => Ok(ExprResult::ok(checker.ctx.bool())),
    }
}

/// Checks a parsed file. On success the returned checker still has the file
/// scope open, so top-level names can be looked up.
#[tracing::instrument(level = "debug", skip_all)]
pub fn type_check(file: &File) -> Result<TypeChecker, Error> {
    let mut checker = TypeChecker::new();
    check_file(&mut checker, file)?;
    Ok(checker)
}
