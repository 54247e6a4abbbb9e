use sf2xrni_core::{assemble_presets, soundfonts::sf2::load_bank, ConvertOptions};

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: split_map <file.sf2> [filter]");
        return;
    };

    let mut options = ConvertOptions::default();
    if let Some(filter) = std::env::args().nth(2) {
        options = options.with_filter(filter);
    }

    let bank = load_bank(path).unwrap();
    for preset in assemble_presets(&bank, &options).unwrap() {
        println!("{} ({} samples)", preset.name, preset.samples.len());
        for (index, keys) in preset.split_map.note_ranges() {
            let sample = &preset.samples[index];
            println!(
                "  {:>3}..={:<3} {} (base note {})",
                keys.start(),
                keys.end(),
                sample.name,
                sample.base_note
            );
        }
    }
}
