use console::Style;
use picos_core::config::CaptureConfig;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_capture_summary(config: &CaptureConfig, source_name: &str) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Picos Capture"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    // Source / Output
    println!(
        "  {:<14}{}",
        s.label.apply_to("Source"),
        s.method.apply_to(source_name)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(config.frame_count)
    );
    println!();

    // Correction
    println!("  {}", s.header.apply_to("Correction"));
    if config.trim_enabled && config.trim > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Trim"),
            s.value.apply_to(format!("{} px", config.trim))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Trim"),
            s.disabled.apply_to("disabled")
        );
    }
    if config.bad_pixel_correction_enabled && !config.bad_pixels.is_empty() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Bad pixels"),
            s.value.apply_to(config.bad_pixels.len())
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Bad pixels"),
            s.disabled.apply_to("none")
        );
    }
    println!();

    // Output scaling
    println!("  {}", s.header.apply_to("Output"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Display"),
        if config.scale_to_full_range {
            s.method.apply_to("full-range stretch")
        } else {
            s.value.apply_to("direct")
        }
    );
    if config.threshold > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Threshold"),
            s.value.apply_to(config.threshold)
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Threshold"),
            s.disabled.apply_to("off")
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("PNG"),
        if config.write_display_image {
            s.value.apply_to("yes")
        } else {
            s.disabled.apply_to("no")
        }
    );
    println!();
}
