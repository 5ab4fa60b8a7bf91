fn main() {
    // The tray shell needs the Tauri context generated at build time. Headless
    // builds skip it entirely.
    #[cfg(feature = "tray")]
    {
        let attrs = tauri_build::Attributes::new();
        tauri_build::try_build(attrs).expect("failed to run tauri_build");
    }
}
