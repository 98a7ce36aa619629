use anyhow::Result;
use crux_core::typegen::TypeGen;
use relayboard_ui_core::{
    events::{FirmwareEvent, PollEvent, RelayEvent, UiEvent},
    types::{PollState, Severity, UpdateCheckError, UpdateVerdict},
    App,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=../app");

    let mut gen = TypeGen::new();

    gen.register_app::<App>()?;

    // Explicitly register domain event enums to ensure all variants are traced
    gen.register_type::<PollEvent>()?;
    gen.register_type::<RelayEvent>()?;
    gen.register_type::<FirmwareEvent>()?;
    gen.register_type::<UiEvent>()?;

    // Explicitly register other enums to ensure all variants are traced
    gen.register_type::<PollState>()?;
    gen.register_type::<Severity>()?;
    gen.register_type::<UpdateCheckError>()?;
    gen.register_type::<UpdateVerdict>()?;

    let output_root = PathBuf::from("./generated");

    gen.typescript("shared_types", output_root.join("typescript"))?;

    Ok(())
}
