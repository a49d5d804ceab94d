//! Whole-lifecycle smoke test: bind, enumerate, run, tear down.

mod common;

use common::RecordingHost;
use sdx_args::{ArgValue, VectorArg};
use sdx_core::Real;
use sdx_runtime::{enumerate, FunctionId, Session, SessionHandle, RUNTIME_VERSION};

fn square(values: Vec<Real>, n: usize) -> ArgValue {
    ArgValue::Vector(VectorArg::square_matrix(values, n).unwrap())
}

#[test]
fn function_table_enumerates_densely() {
    let mut index = 0;
    while let Some(desc) = enumerate(index) {
        assert_eq!(desc.id, FunctionId(index as u16));
        assert!(!desc.name.is_empty());
        index += 1;
    }
    assert_eq!(index, 12);
}

#[test]
fn stale_host_handle_is_refused() {
    let handle = SessionHandle {
        version: RUNTIME_VERSION + 1,
        ..SessionHandle::current()
    };
    assert!(Session::bind(&handle).is_err());
}

#[test]
fn session_survives_inner_teardown_and_growing_scratch() {
    let mut session = Session::bind(&SessionHandle::current()).unwrap();
    let mut host = RecordingHost::new();
    session.begin(true);

    // Small inversion, then a larger one forcing the scratch to grow.
    let mut small = [square(vec![2.0, 0.0, 0.0, 2.0], 2)];
    session
        .dispatch(&mut host, FunctionId::MATRIX_INPLACE_INVERT, &mut small)
        .unwrap();

    let mut large = [
        square(vec![0.0; 16], 4),
        square(
            vec![
                4.0, 0.0, 0.0, 0.0, //
                0.0, 4.0, 0.0, 0.0, //
                0.0, 0.0, 4.0, 0.0, //
                0.0, 0.0, 0.0, 4.0,
            ],
            4,
        ),
    ];
    let rval = session
        .dispatch(&mut host, FunctionId::MATRIX_INVERT, &mut large)
        .unwrap();
    assert_eq!(rval, 0.25);

    // Inner teardown during repeated runs keeps session state usable.
    session.end(false);
    let mut again = [square(vec![2.0, 0.0, 0.0, 2.0], 2)];
    session
        .dispatch(&mut host, FunctionId::MATRIX_INPLACE_INVERT, &mut again)
        .unwrap();

    // The outer teardown releases everything; a rebound session starts
    // clean and still evaluates correctly.
    session.end(true);
    let mut after = [square(vec![4.0, 0.0, 0.0, 4.0], 2)];
    let rval = session
        .dispatch(&mut host, FunctionId::MATRIX_INPLACE_INVERT, &mut after)
        .unwrap();
    assert_eq!(rval, 0.25);
    assert!(host.reports.is_empty());
}
