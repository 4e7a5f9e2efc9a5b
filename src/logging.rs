//! Structured call logging.
//!
//! Each entry point builds one canonical argument list; three independent
//! views derive from it, emitted as `tracing` events when the corresponding
//! bit of the context's [`LogMask`] is set:
//!
//! - **trace**: call name plus positional arguments;
//! - **bench**: a replayable command-line-style invocation string;
//! - **profile**: comma-separated key/value pairs.
//!
//! Record construction is deferred behind a closure so fully-disabled
//! logging costs one mask test per call.

use crate::context::Context;
use crate::scalar::{Scalar, ScalarArg};
use std::fmt;

/// Which log views a context emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogMask {
    pub trace: bool,
    pub bench: bool,
    pub profile: bool,
}

impl LogMask {
    pub const NONE: LogMask = LogMask {
        trace: false,
        bench: false,
        profile: false,
    };

    pub const ALL: LogMask = LogMask {
        trace: true,
        bench: true,
        profile: true,
    };

    #[inline]
    pub fn any(&self) -> bool {
        self.trace || self.bench || self.profile
    }
}

/// One argument in the canonical call record.
#[derive(Debug, Clone)]
pub(crate) enum ArgValue {
    Int(i64),
    UInt(u64),
    Char(char),
    Str(&'static str),
    Text(String),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Int(v) => write!(f, "{v}"),
            ArgValue::UInt(v) => write!(f, "{v}"),
            ArgValue::Char(v) => write!(f, "{v}"),
            ArgValue::Str(v) => write!(f, "{v}"),
            ArgValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<usize> for ArgValue {
    fn from(v: usize) -> Self {
        ArgValue::UInt(v as u64)
    }
}

impl From<isize> for ArgValue {
    fn from(v: isize) -> Self {
        ArgValue::Int(v as i64)
    }
}

impl From<char> for ArgValue {
    fn from(v: char) -> Self {
        ArgValue::Char(v)
    }
}

impl From<&'static str> for ArgValue {
    fn from(v: &'static str) -> Self {
        ArgValue::Str(v)
    }
}

impl ArgValue {
    /// Render a scalar operand: host values print, device operands are
    /// opaque at logging time.
    pub(crate) fn scalar<T: Scalar>(arg: &ScalarArg<'_, T>) -> Self {
        match arg.host_value() {
            Some(v) => ArgValue::Text(format!("{v:?}")),
            None => ArgValue::Str("<device>"),
        }
    }
}

/// Canonical record of one call: name plus ordered named arguments.
pub(crate) struct CallRecord {
    name: &'static str,
    args: Vec<(&'static str, ArgValue)>,
}

impl CallRecord {
    pub(crate) fn new(name: &'static str, args: Vec<(&'static str, ArgValue)>) -> Self {
        CallRecord { name, args }
    }

    /// `gemv N 4 7 2.0 ...`: name plus positional arguments.
    fn trace_line(&self) -> String {
        let mut s = String::from(self.name);
        for (_, v) in &self.args {
            s.push(' ');
            s.push_str(&v.to_string());
        }
        s
    }

    /// `./bench -f gemv --trans N -m 4 ...`: a replayable invocation.
    fn bench_line(&self) -> String {
        let mut s = format!("./bench -f {}", self.name);
        for (k, v) in &self.args {
            if k.len() == 1 {
                s.push_str(&format!(" -{k} {v}"));
            } else {
                s.push_str(&format!(" --{k} {v}"));
            }
        }
        s
    }

    /// `call=gemv,trans=N,m=4,...`: named key/value pairs.
    fn profile_line(&self) -> String {
        let mut s = format!("call={}", self.name);
        for (k, v) in &self.args {
            s.push_str(&format!(",{k}={v}"));
        }
        s
    }
}

/// Emit the enabled views of a call record. The record is only built when
/// at least one view is enabled.
pub(crate) fn log_call<F>(ctx: &Context, build: F)
where
    F: FnOnce() -> CallRecord,
{
    let mask = ctx.log_mask();
    if !mask.any() {
        return;
    }
    let record = build();
    if mask.trace {
        tracing::trace!(target: "strided_blas::trace", "{}", record.trace_line());
    }
    if mask.bench {
        tracing::info!(target: "strided_blas::bench", "{}", record.bench_line());
    }
    if mask.profile {
        tracing::info!(target: "strided_blas::profile", "{}", record.profile_line());
    }
}
