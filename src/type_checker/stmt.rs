use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::{
        ast::{File, FuncDecl},
        expressions::Expr,
        statements::{Assignable, Lvalue, MultiDeclStmt, SingleDeclStmt, Stmt},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    scope::{Object, ObjectKind},
    type_checker::{
        assignable, check_call, check_subscript, check_value, resolve_type, ExprResult,
        FunctionContext, ResultMode, TypeChecker,
    },
    types::{type_equal, Type, TypeRef},
    universe::library_builtins,
};

/// Checks a whole file.
///
/// Library builtins and every function signature are bound in the file
/// scope before any body is checked, so functions may call each other in any
/// order. Inside bodies names are bound as their declarations are reached.
pub fn check_file(checker: &mut TypeChecker, file: &File) -> Result<(), Error> {
    checker.scopes.open();

    for use_decl in &file.uses {
        let lib = &use_decl.lib.name;
        if checker.used_libraries.contains(lib) {
            continue;
        }

        let Some(builtins) = library_builtins(&checker.ctx, lib) else {
            return Err(Error::new(
                ErrorImpl::UnknownLibrary { name: lib.clone() },
                use_decl.lib.position,
            ));
        };
        for builtin in builtins {
            checker.declare(builtin)?;
        }
        checker.used_libraries.push(lib.clone());
    }

    for func in &file.funcs {
        let signature = func_signature(checker, func)?;
        checker.declare(Object::new(
            ObjectKind::Func,
            &func.name.name,
            func.name.position,
            signature,
        ))?;
    }

    for func in &file.funcs {
        check_func(checker, func)?;
    }

    Ok(())
}

fn func_signature(checker: &TypeChecker, func: &FuncDecl) -> Result<TypeRef, Error> {
    let params = func
        .params
        .iter()
        .map(|param| resolve_type(checker, &param.ty))
        .collect::<Result<Vec<_>, _>>()?;
    let results = func
        .results
        .iter()
        .map(|result| resolve_type(checker, result))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(checker.ctx.signature(params, results))
}

fn check_func(checker: &mut TypeChecker, func: &FuncDecl) -> Result<(), Error> {
    let name = &func.name.name;
    debug!(function = %name, "checking function");

    let signature = match checker.lookup(name) {
        Some(object) if object.kind == ObjectKind::Func => Rc::clone(&object.ty),
        _ => {
            return Err(Error::new(
                ErrorImpl::NotDefined { name: name.clone() },
                func.name.position,
            ))
        }
    };
    let Type::Signature { params, results } = signature.as_ref() else {
        return Err(Error::new(
            ErrorImpl::NotCallable { name: name.clone() },
            func.name.position,
        ));
    };

    checker.scopes.open();
    checker.function = Some(FunctionContext {
        name: name.clone(),
        results: results.clone(),
    });

    for (param, ty) in func.params.iter().zip(params) {
        checker.declare_var(&param.name.name, param.name.position, Rc::clone(ty))?;
    }

    // Parameters and the outermost block share one scope.
    let terminates = check_stmts(checker, &func.body.stmts)?;

    checker.function = None;
    checker.scopes.close();

    if !results.is_empty() && !terminates {
        return Err(Error::new(
            ErrorImpl::MissingReturn {
                function: name.clone(),
            },
            func.position,
        ));
    }

    Ok(())
}

/// Checks a statement list and reports whether it always returns.
fn check_stmts(checker: &mut TypeChecker, stmts: &[Stmt]) -> Result<bool, Error> {
    let mut terminates = false;
    for stmt in stmts {
        terminates |= check_stmt(checker, stmt)?;
    }
    Ok(terminates)
}

fn check_scoped(checker: &mut TypeChecker, stmt: &Stmt) -> Result<bool, Error> {
    checker.scopes.open();
    let terminates = check_stmt(checker, stmt)?;
    checker.scopes.close();
    Ok(terminates)
}

fn check_condition(checker: &TypeChecker, cond: &Expr) -> Result<(), Error> {
    let result = check_value(checker, cond)?;
    if !result.is_bool() {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: String::from("bool"),
                found: result.to_string(),
            },
            cond.position(),
        ));
    }
    Ok(())
}

fn check_assignable_value(target: &Type, value: &Expr, result: &ExprResult) -> Result<(), Error> {
    if assignable(target, result) {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: target.to_string(),
                found: result.to_string(),
            },
            value.position(),
        ))
    }
}

/// Checks one statement. Returns true if it cannot complete normally.
pub fn check_stmt(checker: &mut TypeChecker, stmt: &Stmt) -> Result<bool, Error> {
    match stmt {
        Stmt::Assign(assign) => {
            let target = match &assign.lhs {
                Lvalue::Ident(ident) => match checker.lookup(&ident.name) {
                    Some(object) if object.kind == ObjectKind::Var => Some(Rc::clone(&object.ty)),
                    Some(_) => {
                        return Err(Error::new(
                            ErrorImpl::NotAssignable {
                                name: ident.name.clone(),
                            },
                            ident.position,
                        ))
                    }
                    None => {
                        return Err(Error::new(
                            ErrorImpl::NotDefined {
                                name: ident.name.clone(),
                            },
                            ident.position,
                        ))
                    }
                },
                Lvalue::Subscript(subscript) => check_subscript(checker, subscript)?.ty,
            };

            let value = check_value(checker, &assign.rhs)?;
            if let Some(target) = target {
                check_assignable_value(&target, &assign.rhs, &value)?;
            }
            Ok(false)
        }
        Stmt::If(if_stmt) => {
            check_condition(checker, &if_stmt.cond)?;
            let then = check_scoped(checker, &if_stmt.then)?;
            let otherwise = match &if_stmt.otherwise {
                Some(otherwise) => check_scoped(checker, otherwise)?,
                None => false,
            };
            Ok(then && otherwise)
        }
        Stmt::While(while_stmt) => {
            check_condition(checker, &while_stmt.cond)?;
            check_scoped(checker, &while_stmt.body)?;
            Ok(false)
        }
        Stmt::Return(ret) => {
            let results = match &checker.function {
                Some(function) => function.results.clone(),
                None => {
                    return Err(Error::new(
                        ErrorImpl::Internal {
                            message: String::from("return outside of a function"),
                        },
                        ret.position,
                    ))
                }
            };

            if ret.values.len() != results.len() {
                return Err(Error::new(
                    ErrorImpl::ResultCount {
                        expected: results.len(),
                        received: ret.values.len(),
                    },
                    ret.position,
                ));
            }
            for (value, expected) in ret.values.iter().zip(&results) {
                let result = check_value(checker, value)?;
                check_assignable_value(expected, value, &result)?;
            }
            Ok(true)
        }
        Stmt::Block(block) => {
            checker.scopes.open();
            let terminates = check_stmts(checker, &block.stmts)?;
            checker.scopes.close();
            Ok(terminates)
        }
        Stmt::SingleDecl(decl) => {
            check_single_decl(checker, decl)?;
            Ok(false)
        }
        Stmt::MultiDecl(decl) => {
            check_multi_decl(checker, decl)?;
            Ok(false)
        }
        Stmt::Call(call) => {
            let result = check_call(checker, call)?;
            if result.mode != ResultMode::None {
                return Err(Error::new(
                    ErrorImpl::UnusedResult {
                        name: call.func.name.clone(),
                    },
                    call.position,
                ));
            }
            Ok(false)
        }
    }
}

/// The initializer is checked before the name is bound, so `x: int = x`
/// only sees an outer `x`.
fn check_single_decl(checker: &mut TypeChecker, decl: &SingleDeclStmt) -> Result<(), Error> {
    let ty = resolve_type(checker, &decl.spec.ty)?;

    if let Some(init) = &decl.init {
        let result = check_value(checker, init)?;
        check_assignable_value(&ty, init, &result)?;
    }

    checker.declare_var(&decl.spec.name.name, decl.spec.name.position, ty)
}

fn check_multi_decl(checker: &mut TypeChecker, decl: &MultiDeclStmt) -> Result<(), Error> {
    let result = check_call(checker, &decl.init)?;
    let results = match (result.mode, &result.ty) {
        (ResultMode::Ok, Some(ty)) => match ty.as_ref() {
            Type::Tuple(types) => types.clone(),
            _ => vec![Rc::clone(ty)],
        },
        _ => vec![],
    };

    if results.len() != decl.assignables.len() {
        return Err(Error::new(
            ErrorImpl::ResultCount {
                expected: decl.assignables.len(),
                received: results.len(),
            },
            decl.init.position,
        ));
    }

    for (assignable, result) in decl.assignables.iter().zip(results) {
        let Assignable::Spec(spec) = assignable else {
            continue;
        };

        let ty = resolve_type(checker, &spec.ty)?;
        if !type_equal(&ty, &result) {
            return Err(Error::new(
                ErrorImpl::TypeMismatch {
                    expected: ty.to_string(),
                    found: result.to_string(),
                },
                spec.position,
            ));
        }
        checker.declare_var(&spec.name.name, spec.name.position, ty)?;
    }

    Ok(())
}
