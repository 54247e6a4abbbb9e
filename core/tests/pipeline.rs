use sf2xrni_core::{
    assemble_preset, assemble_presets,
    soundfonts::sf2::{Sf2Bank, Sf2Instrument, Sf2Preset, Sf2SampleHeader, Sf2Zone},
    ConvertOptions, LoopMode, Range, ThreadCount,
};

fn single_zone_bank() -> Sf2Bank {
    Sf2Bank {
        presets: vec![Sf2Preset {
            name: "Lead".into(),
            zones: vec![Sf2Zone {
                index: Some(0),
                ..Default::default()
            }],
            ..Default::default()
        }],
        instruments: vec![Sf2Instrument {
            name: "Lead".into(),
            zones: vec![Sf2Zone {
                index: Some(0),
                keyrange: Some(Range::new(60, 72).to_packed()),
                ..Default::default()
            }],
        }],
        sample_headers: vec![Sf2SampleHeader {
            name: "Saw".into(),
            start: 0,
            end: 50,
            loop_start: 10,
            loop_end: 40,
            sample_rate: 44100,
            origpitch: 66,
            pitchadj: 0,
        }],
        sample_data: (0..100u8).collect::<Vec<_>>().into(),
    }
}

#[test]
fn single_zone_extends_to_keyboard_edges() {
    let bank = single_zone_bank();
    let resolved = assemble_preset(&bank, &bank.presets[0]);

    assert_eq!(resolved.samples.len(), 1);
    for key in 0..128u8 {
        assert_eq!(resolved.split_map.get(key), Some(0), "key {key}");
    }

    let sample = &resolved.samples[0];
    assert_eq!(sample.pcm.len(), 100);
    assert_eq!(sample.sample_rate, 44100);
    assert_eq!(sample.base_note, 66);
    assert_eq!(sample.loop_start, 10);
    assert_eq!(sample.loop_end, 40);
    assert_eq!(sample.loop_mode, LoopMode::Off);
    assert_eq!(sample.name, "Sample00(Saw)");
}

/// Two instruments, a drum style preset: each preset zone adds its own samples.
fn layered_bank() -> Sf2Bank {
    let header = |name: &str, start: u32| Sf2SampleHeader {
        name: name.into(),
        start,
        end: start + 8,
        loop_start: start,
        loop_end: start + 8,
        sample_rate: 32000,
        origpitch: 60,
        pitchadj: 3,
    };
    let zone = |sample: u16, low: u8, high: u8, velrange: Option<u16>| Sf2Zone {
        index: Some(sample),
        keyrange: Some(Range::new(low, high).to_packed()),
        velrange,
        sample_mode: Some(1),
        ..Default::default()
    };

    Sf2Bank {
        presets: vec![Sf2Preset {
            name: "Kit".into(),
            zones: vec![
                Sf2Zone {
                    index: Some(1),
                    ..Default::default()
                },
                Sf2Zone {
                    index: Some(0),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }],
        instruments: vec![
            Sf2Instrument {
                name: "Kicks".into(),
                zones: vec![
                    zone(0, 35, 36, Some(Range::new(0, 90).to_packed())),
                    zone(1, 35, 36, Some(Range::new(91, 127).to_packed())),
                ],
            },
            Sf2Instrument {
                name: "Snares".into(),
                zones: vec![zone(2, 38, 40, None), zone(2, 38, 40, None)],
            },
        ],
        sample_headers: vec![header("Kick soft", 0), header("Kick hard", 8), header("Snare", 16)],
        sample_data: vec![1u8; 48].into(),
    }
}

#[test]
fn drum_kit_keeps_loudest_layer() {
    let bank = layered_bank();
    let resolved = assemble_preset(&bank, &bank.presets[0]);

    let names: Vec<&str> = resolved.samples.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Sample01(Kick hard)", "Sample00(Snare)"]);
    assert_eq!(resolved.stats.velocity_layers_dropped, 1);
    assert_eq!(resolved.stats.duplicates_dropped, 1);
    assert_eq!(resolved.samples[0].velocity_range, Range::new(91, 127));
    assert_eq!(resolved.samples[1].velocity_range, Range::UNBOUNDED);

    assert_eq!(resolved.split_map.get(0), Some(0));
    assert_eq!(resolved.split_map.get(37), Some(0));
    assert_eq!(resolved.split_map.get(38), Some(1));
    assert_eq!(resolved.split_map.get(127), Some(1));
    assert!(resolved
        .samples
        .iter()
        .all(|s| s.loop_mode == LoopMode::Forward && s.fine_tune == 3));
}

#[test]
fn conversion_is_repeatable() {
    let bank = layered_bank();
    let options = ConvertOptions::default().with_threading(ThreadCount::Manual(2));

    let first = assemble_presets(&bank, &options).unwrap();
    let second = assemble_presets(&bank, &options).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.split_map, b.split_map);
        let pcm_a: Vec<&[u8]> = a.samples.iter().map(|s| &s.pcm[..]).collect();
        let pcm_b: Vec<&[u8]> = b.samples.iter().map(|s| &s.pcm[..]).collect();
        assert_eq!(pcm_a, pcm_b);
    }
}

#[test]
fn every_split_entry_points_at_a_sample() {
    for bank in [single_zone_bank(), layered_bank()] {
        for preset in assemble_presets(&bank, &ConvertOptions::default()).unwrap() {
            assert!(preset.split_map.is_complete());
            assert!(preset
                .split_map
                .iter()
                .flatten()
                .all(|index| index < preset.samples.len()));
        }
    }
}
