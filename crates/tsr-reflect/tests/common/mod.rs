//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::pin::pin;
use std::sync::Once;
use std::task::{Context, Poll, Waker};
use tsr_reflect::{PropertyDescriptor, TypeDescriptor, TypeKind, TypeRef};

/// Route trace output through the test harness, honoring `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Inline reference to a native type by name.
pub fn native_ref(name: &str) -> TypeRef {
    TypeRef::Inline(Box::new(TypeDescriptor {
        kind: TypeKind::Native,
        name: name.into(),
        full_name: name.into(),
        ..Default::default()
    }))
}

pub fn prop(name: &str, ty: TypeRef) -> PropertyDescriptor {
    PropertyDescriptor {
        name: name.into(),
        ty,
        ..Default::default()
    }
}

pub fn optional_prop(name: &str, ty: TypeRef) -> PropertyDescriptor {
    PropertyDescriptor {
        name: name.into(),
        ty,
        optional: true,
        ..Default::default()
    }
}

pub fn class_desc(name: &str, properties: Vec<PropertyDescriptor>) -> TypeDescriptor {
    TypeDescriptor {
        kind: TypeKind::Class,
        name: name.into(),
        full_name: format!("test/{name}"),
        properties,
        ..Default::default()
    }
}

pub fn interface_desc(name: &str, properties: Vec<PropertyDescriptor>) -> TypeDescriptor {
    TypeDescriptor {
        kind: TypeKind::Interface,
        name: name.into(),
        full_name: format!("test/{name}"),
        properties,
        ..Default::default()
    }
}

/// Drive a future that is expected to complete without yielding. The only
/// asynchronous operation in the model (constructor resolution) is a leaf
/// that resolves immediately in tests.
pub fn poll_ready<F: Future>(future: F) -> F::Output {
    let waker = Waker::noop();
    let mut cx = Context::from_waker(waker);
    let mut future = pin!(future);
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(value) => value,
        Poll::Pending => panic!("future was not immediately ready"),
    }
}
