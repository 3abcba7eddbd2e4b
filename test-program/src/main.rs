use std::process::ExitCode;

use pcsp::builtin::avx2::{VALUE_ENTRY, VALUE_TABLE};
use pcsp::{Addr, Frame};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let registry = tracing_subscriber::Registry::default().with(
        EnvFilter::builder()
            .with_default_directive(tracing::Level::TRACE.into())
            .from_env()
            .unwrap(),
    );

    let tree_layer = tracing_tree::HierarchicalLayer::new(2)
        .with_targets(true)
        .with_bracketed_fields(true);

    registry.with(tree_layer).init();

    if let Err(err) = VALUE_TABLE.validate() {
        tracing::error!("refusing to use the AVX2 value table: {err}");
        return ExitCode::FAILURE;
    }

    for routine in VALUE_TABLE.iter() {
        println!(
            "{} entry={} size={} frame={}",
            routine.name, routine.entry, routine.size, routine.frame_size
        );
        for (range, depth) in routine.segments() {
            println!("  {:>5}..{:<5} sp-{depth}", range.start, range.end);
        }
    }

    // A fake stack as a scanner would see it with the thread paused in `_value`.
    let mut stack = [0usize; 16];
    stack[6] = 0x1234;
    let blob_base = Addr(0x7f00_0000);
    let sp = Addr(stack.as_ptr() as usize);

    for offset in [0, 4, 13, 500, 3601, 3618, 5000] {
        let pc = blob_base.byte_add((VALUE_ENTRY + offset) as usize);
        let Some(frame) = Frame::resolve(&VALUE_TABLE, blob_base, pc, sp) else {
            println!("{offset:>5}: not inside a routine");
            continue;
        };
        println!(
            "{offset:>5}: {} depth={} caller_sp={:#x}",
            frame.routine.name,
            frame.depth,
            frame.caller_sp().addr()
        );
    }

    let pc = blob_base.byte_add((VALUE_ENTRY + 500) as usize);
    if let Some(frame) = Frame::resolve(&VALUE_TABLE, blob_base, pc, sp) {
        // SAFETY: `sp` points at `stack`, which covers the whole frame.
        let ret = unsafe { frame.return_address() };
        println!("return address at depth {}: {:#x}", frame.depth, ret.addr());
    }

    ExitCode::SUCCESS
}
