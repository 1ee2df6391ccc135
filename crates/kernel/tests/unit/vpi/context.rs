//! # VPI Context Tests
//!
//! Name resolution, value access, finish requests and simulator information
//! through a `Vpi` borrowed from a kernel.

use rstest::rstest;

use vpisim_core::SimError;
use vpisim_core::common::SimTime;
use vpisim_core::sim::Kernel;
use vpisim_core::vpi::{CbRequest, Handle, ObjectKind, ValueFormat, VpiValue};

use crate::common::harness::{args, kernel};
use crate::common::mocks::design::{MockDesign, event_log};

#[test]
fn test_handle_by_name_absolute_and_relative() {
    let mut k = kernel(MockDesign::new(event_log()));
    let vpi = k.vpi();
    let scope = vpi.handle_by_name("TOP.mock", None).unwrap();
    let clk = vpi.handle_by_name("TOP.mock.clk", None).unwrap();

    assert_eq!(vpi.handle_by_name("clk", Some(scope)).unwrap(), clk);
    assert_eq!(clk, Handle::Signal(MockDesign::CLK));
    assert_eq!(vpi.kind(scope).unwrap(), ObjectKind::Module);
    assert_eq!(vpi.kind(clk).unwrap(), ObjectKind::Net);
    assert_eq!(vpi.name(clk).unwrap(), "clk");
    assert_eq!(vpi.full_name(clk).unwrap(), "TOP.mock.clk");
    assert_eq!(vpi.size(clk).unwrap(), 1);
    assert_eq!(vpi.parent(clk).unwrap(), Some(scope));
    assert_eq!(vpi.iterate(Some(scope)).unwrap().len(), 3);
}

#[test]
fn test_missing_handle_reports_caller_location() {
    let mut k = kernel(MockDesign::new(event_log()));
    let expected_line = line!() + 1;
    let err = k.vpi().handle_by_name("TOP.mock.nope", None).unwrap_err();

    match err {
        SimError::HandleNotFound { name, file, line } => {
            assert_eq!(name, "TOP.mock.nope");
            assert_eq!(file, file!());
            assert_eq!(line, expected_line);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_relative_handle_reports_full_name() {
    let mut k = kernel(MockDesign::new(event_log()));
    let vpi = k.vpi();
    let scope = vpi.handle_by_name("TOP.mock", None).unwrap();
    let err = vpi.handle_by_name("nope", Some(scope)).unwrap_err();
    assert!(matches!(err, SimError::HandleNotFound { name, .. } if name == "TOP.mock.nope"));
}

#[rstest]
#[case(VpiValue::Int(0x5A), 0x5A)]
#[case(VpiValue::Int(-1), 0xFF)]
#[case(VpiValue::BinStr("1111_0000".into()), 0xF0)]
#[case(VpiValue::HexStr("1ab".into()), 0xAB)]
#[case(VpiValue::DecStr("200".into()), 200)]
fn test_put_value_writes_masked_bits(#[case] value: VpiValue, #[case] bits: u64) {
    let mut k = kernel(MockDesign::new(event_log()));
    {
        let mut vpi = k.vpi();
        let data = vpi.handle_by_name("TOP.mock.data", None).unwrap();
        vpi.put_value(data, &value).unwrap();
    }
    assert_eq!(k.design().peek(MockDesign::DATA), bits);
}

#[test]
fn test_get_value_in_each_format() {
    let mut k = kernel(MockDesign::new(event_log()));
    let mut vpi = k.vpi();
    let data = vpi.handle_by_name("TOP.mock.data", None).unwrap();
    vpi.put_value(data, &VpiValue::Int(0x81)).unwrap();

    assert_eq!(vpi.get_value(data, ValueFormat::Int).unwrap(), VpiValue::Int(0x81));
    assert_eq!(
        vpi.get_value(data, ValueFormat::Scalar).unwrap(),
        VpiValue::Scalar(true)
    );
    assert_eq!(
        vpi.get_value(data, ValueFormat::BinStr).unwrap(),
        VpiValue::BinStr("10000001".into())
    );
    assert_eq!(
        vpi.get_value(data, ValueFormat::HexStr).unwrap(),
        VpiValue::HexStr("81".into())
    );
    assert_eq!(
        vpi.get_value(data, ValueFormat::DecStr).unwrap(),
        VpiValue::DecStr("129".into())
    );
}

#[test]
fn test_scope_has_no_value() {
    let mut k = kernel(MockDesign::new(event_log()));
    let mut vpi = k.vpi();
    let scope = vpi.handle_by_name("TOP.mock", None).unwrap();

    let read = vpi.get_value(scope, ValueFormat::Int).unwrap_err();
    assert!(matches!(read, SimError::WrongObjectKind { found: "vpiModule", .. }));
    let write = vpi.put_value(scope, &VpiValue::Int(1)).unwrap_err();
    assert!(matches!(write, SimError::WrongObjectKind { .. }));
}

#[test]
fn test_foreign_handles_are_errors_not_panics() {
    let mut k = kernel(MockDesign::new(event_log()));
    let mut vpi = k.vpi();
    let stale_signal = Handle::Signal(99);
    let stale_scope = Handle::Scope(42);
    let invalid = |handle: Handle| SimError::InvalidHandle {
        handle: handle.to_string(),
    };

    assert_eq!(
        vpi.get_value(stale_signal, ValueFormat::Int).unwrap_err(),
        invalid(stale_signal)
    );
    assert_eq!(
        vpi.put_value(stale_signal, &VpiValue::Int(1)).unwrap_err(),
        invalid(stale_signal)
    );
    assert_eq!(
        vpi.handle_by_name("clk", Some(stale_scope)).unwrap_err(),
        invalid(stale_scope)
    );
    assert_eq!(vpi.name(stale_signal).unwrap_err(), invalid(stale_signal));
    assert_eq!(vpi.iterate(Some(stale_scope)).unwrap_err(), invalid(stale_scope));
    assert_eq!(
        vpi.register_cb(CbRequest::value_change(stale_signal, ValueFormat::Int, |_, _| Ok(())))
            .unwrap_err(),
        invalid(stale_signal)
    );
    assert_eq!(
        vpi.register_cb(CbRequest::after_delay(1, |_, _| Ok(())).with_object(stale_scope))
            .unwrap_err(),
        invalid(stale_scope)
    );
}

#[test]
fn test_bad_string_is_invalid_value() {
    let mut k = kernel(MockDesign::new(event_log()));
    let mut vpi = k.vpi();
    let data = vpi.handle_by_name("TOP.mock.data", None).unwrap();
    let err = vpi
        .put_value(data, &VpiValue::HexStr("zz".into()))
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidValue { signal, .. } if signal == "TOP.mock.data"));
}

#[test]
fn test_finish_request_is_visible_to_kernel() {
    let mut k = kernel(MockDesign::new(event_log()));
    assert!(!k.got_finish());
    {
        let mut vpi = k.vpi();
        assert!(!vpi.got_finish());
        vpi.finish();
        assert!(vpi.got_finish());
    }
    assert!(k.got_finish());
}

#[test]
fn test_time_starts_at_zero() {
    let mut k = kernel(MockDesign::new(event_log()));
    assert_eq!(k.vpi().time(), SimTime::ZERO);
    assert_eq!(k.time(), SimTime::ZERO);
}

#[test]
fn test_vlog_info_reports_product_and_argv() {
    let mut k = Kernel::new(
        Box::new(MockDesign::new(event_log())),
        args(&["+trace", "-v"]),
    )
    .unwrap();
    let vpi = k.vpi();
    let info = vpi.vlog_info();
    assert_eq!(info.product, "vpisim");
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(info.argv, ["vpisim", "+trace", "-v"]);
    assert!(vpi.args().test_plusarg("trace"));
}
