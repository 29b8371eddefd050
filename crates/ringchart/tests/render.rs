use image::{Rgba, RgbaImage};
use ringchart::{
    Band, ChartConfig, ChartImage, Color, FontSpec, Guideline, Icon, LineCap, RenderError,
    StyledText, animated_image, animated_image_with_frame_rate, compute_layout, image,
    image_for_time, size,
};

const RED: (f64, f64, f64) = (0.9, 0.1, 0.2);

fn red() -> Color {
    Color::rgb(RED.0, RED.1, RED.2)
}

fn single_band(value: f64) -> ChartConfig {
    ChartConfig::default().with_band(Band::new(red(), Color::rgb(1.0, 0.5, 0.6), value))
}

fn assert_color_close(pixel: [u8; 4], expected: (f64, f64, f64)) {
    let expected = [expected.0, expected.1, expected.2].map(|c| (c * 255.0).round() as i32);
    for (actual, expected) in pixel[..3].iter().zip(expected) {
        assert!(
            (*actual as i32 - expected).abs() <= 2,
            "{pixel:?} is not close to {expected:?}"
        );
    }
    assert_eq!(pixel[3], 255);
}

#[test]
fn test_size_covers_the_disc() {
    let config = single_band(0.5);
    let size = size(&config).unwrap();
    assert!(size.width >= 150.0);
    assert!(size.height >= 150.0);
    assert_eq!(size, ringchart::size(&config).unwrap());
}

#[test]
fn test_final_image_matches_last_moment() {
    let config = single_band(0.8)
        .with_band(Band::new(Color::rgb(0.2, 0.9, 0.1), Color::white(), 0.3).with_caption("MOVE"))
        .with_guideline(Guideline::at(0.8));

    let final_image = image(&config).unwrap();
    let last_moment = image_for_time(&config, config.animation_duration).unwrap();
    assert_eq!(final_image, last_moment);
}

#[test]
fn test_rendering_is_idempotent() {
    let config = single_band(0.6).with_guideline(Guideline::at(0.3));
    let first = image_for_time(&config, 0.7).unwrap();
    let second = image_for_time(&config, 0.7).unwrap();
    assert_eq!(first.as_rgba().as_raw(), second.as_rgba().as_raw());
}

#[test]
fn test_band_sweeps_in_from_nothing() {
    let config = single_band(1.0);
    // 3 o'clock on the band's mid radius
    let (x, y) = (75 + 67, 75);

    let start = image_for_time(&config, 0.0).unwrap();
    assert!(start.as_rgba().pixels().all(|p| p.0[3] == 0));

    let end = image_for_time(&config, 2.0).unwrap();
    assert_color_close(end.pixel(x, y), RED);

    let halfway = image_for_time(&config, 1.0).unwrap();
    assert_eq!(halfway.pixel(x, y)[3], 255);
    // 9 o'clock is not reached yet at half time
    assert_eq!(halfway.pixel(75 - 67, 75 + 8)[3], 0);
}

#[test]
fn test_end_color_is_reached_at_the_tip() {
    let end_color = (0.1, 0.3, 1.0);
    let config = ChartConfig::default().with_band(Band::new(
        red(),
        Color::rgb(end_color.0, end_color.1, end_color.2),
        1.0,
    ));
    let frame = image(&config).unwrap();
    // just before 12 o'clock, where the full ring ends
    let tip = frame.pixel(75 - 3, 75 - 67);
    assert_color_close(tip, end_color);
}

#[test]
fn test_background_track_is_drawn_at_time_zero() {
    let config = ChartConfig::default().with_band(
        Band::new(red(), red(), 0.5).with_background(Color::rgb(0.3, 0.3, 0.3)),
    );
    let frame = image_for_time(&config, 0.0).unwrap();
    assert_color_close(frame.pixel(75 - 67, 75), (0.3, 0.3, 0.3));
}

#[test]
fn test_guideline_is_drawn_at_quarter_turn() {
    let guideline = Guideline {
        position: 0.25,
        color: Color::white(),
        line_width: 2.0,
        extra_before: 4.0,
        extra_after: 4.0,
        line_cap: LineCap::Butt,
        dash: Vec::new(),
    };
    let config = single_band(0.0).with_guideline(guideline);
    let frame = image(&config).unwrap();

    assert_eq!((frame.width(), frame.height()), (155, 150));
    assert_color_close(frame.pixel(75 + 67, 74), (1.0, 1.0, 1.0));
    assert_color_close(frame.pixel(75 + 67, 75), (1.0, 1.0, 1.0));
    // from 55 to 79 points out, nowhere else
    assert_eq!(frame.pixel(75 + 50, 75)[3], 0);
    assert_eq!(frame.pixel(75, 75 - 67)[3], 0);
}

#[test]
fn test_dashed_guideline_leaves_gaps() {
    let guideline = Guideline {
        position: 0.25,
        line_width: 2.0,
        extra_before: 0.0,
        extra_after: 0.0,
        dash: vec![4.0, 4.0],
        ..Default::default()
    };
    let config = single_band(0.0).with_guideline(guideline);
    let frame = image(&config).unwrap();

    // dashes start at the inner end, 59 points out
    assert_eq!(frame.pixel(75 + 60, 75)[3], 255);
    assert_eq!(frame.pixel(75 + 65, 75)[3], 0);
}

#[test]
fn test_missing_font_fails_before_drawing() {
    let config = ChartConfig {
        font: None,
        ..single_band(0.5)
    };
    let config = ChartConfig {
        bands: vec![Band::new(red(), red(), 0.5).with_caption("MOVE")],
        ..config
    };

    assert!(matches!(
        image(&config),
        Err(RenderError::MissingFont { index: 0 })
    ));
    assert!(matches!(
        animated_image(&config),
        Err(RenderError::MissingFont { index: 0 })
    ));
}

#[test]
fn test_values_above_one_still_render() {
    let frame = image(&single_band(1.4)).unwrap();
    assert_eq!(frame.pixel(75 + 67, 75)[3], 255);
}

#[test]
fn test_deeply_nested_bands_are_skipped() {
    let mut config = ChartConfig {
        radius: 30.0,
        ..Default::default()
    };
    for _ in 0..4 {
        config.bands.push(Band::new(red(), red(), 1.0).with_caption("X"));
    }
    let center = compute_layout(&config).unwrap().center;
    let frame = image(&config).unwrap();
    assert_eq!(frame.pixel(center.x as u32, center.y as u32)[3], 0);
}

#[test]
fn test_icon_fades_in() {
    let icon = Icon::from_rgba(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255])), 1.0);
    let config = ChartConfig::default().with_band(Band::new(red(), red(), 0.0).with_icon(icon));
    // icon centered on the band start, 8 points below the top edge
    let (x, y) = (75, 8);

    assert_eq!(image_for_time(&config, 0.0).unwrap().pixel(x, y)[3], 0);
    assert_color_close(image(&config).unwrap().pixel(x, y), (0.0, 0.0, 1.0));
}

#[test]
fn test_center_text_keeps_canvas_at_least_disc_sized() {
    let config = ChartConfig {
        large_text: Some(StyledText::new("420", FontSpec::default(), Color::white())),
        small_text: Some(StyledText::new("CAL", FontSpec::default(), Color::white())),
        ..single_band(0.5)
    };
    let frame = image(&config).unwrap();
    assert!(frame.width() >= 150);
    assert!(frame.height() >= 150);
}

#[test]
fn test_scale_multiplies_pixels() {
    let config = ChartConfig {
        scale: 2.0,
        ..single_band(1.0)
    };
    let frame = image(&config).unwrap();
    assert_eq!((frame.width(), frame.height()), (300, 300));
    assert_color_close(frame.pixel(2 * (75 + 67), 150), RED);
}

#[test]
fn test_canvas_color_fills_background() {
    let config = ChartConfig {
        canvas_color: Some(Color::black()),
        ..single_band(0.25)
    };
    let frame = image(&config).unwrap();
    assert_eq!(frame.pixel(0, 0), [0, 0, 0, 255]);
}

#[test]
fn test_animation_frames() {
    let config = single_band(1.0);
    let animation = animated_image(&config).unwrap();

    assert_eq!(animation.frames().len(), 60);
    assert!(!animation.is_looping());
    assert_eq!(animation.last_frame(), Some(&image(&config).unwrap()));
    assert!(
        animation.frames()[0]
            .as_rgba()
            .pixels()
            .all(|p| p.0[3] == 0)
    );

    let mut gif = Vec::new();
    animation.write_gif(&mut gif).unwrap();
    assert!(gif.starts_with(b"GIF89a"));
}

#[test]
fn test_zero_duration_animation_has_one_final_frame() {
    let config = ChartConfig {
        animation_duration: 0.0,
        ..single_band(0.5)
    };
    let animation = animated_image_with_frame_rate(&config, 24.0).unwrap();
    assert_eq!(animation.frames().len(), 1);
    assert_eq!(animation.frames()[0], image(&config).unwrap());
}

#[test]
fn test_guideline_crosses_a_full_band() {
    let blue = (0.0, 0.0, 1.0);
    let guideline = Guideline {
        position: 0.25,
        color: Color::rgb(blue.0, blue.1, blue.2),
        line_width: 2.0,
        ..Default::default()
    };
    let config = single_band(1.0).with_guideline(guideline);
    let frame = image(&config).unwrap();

    // drawn over the band where they cross, band visible right next to it
    assert_color_close(frame.pixel(75 + 67, 75), blue);
    assert_color_close(frame.pixel(75 + 67, 75 + 4), RED);
}

fn opaque_pixels_in(frame: &ChartImage, bounds: ringchart::geometry::Rect) -> usize {
    let x0 = bounds.min.x.floor().max(0.0) as u32;
    let y0 = bounds.min.y.floor().max(0.0) as u32;
    let x1 = (bounds.max.x.ceil() as u32).min(frame.width());
    let y1 = (bounds.max.y.ceil() as u32).min(frame.height());
    (y0..y1)
        .flat_map(|y| (x0..x1).map(move |x| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y)[3] > 0)
        .count()
}

#[test]
fn test_caption_is_drawn_left_of_band_start() {
    let config =
        ChartConfig::default().with_band(Band::new(red(), red(), 0.0).with_caption("MOVE"));
    let layout = compute_layout(&config).unwrap();
    let bounds = layout.captions[0].unwrap().bounds();
    assert!(bounds.max.x < layout.center.x);

    let frame = image(&config).unwrap();
    assert!(opaque_pixels_in(&frame, bounds) > 0);
    // an empty band draws nothing right of its start
    let center_x = layout.center.x as u32;
    assert!(
        frame
            .as_rgba()
            .enumerate_pixels()
            .all(|(x, _, p)| x < center_x || p.0[3] == 0)
    );
}

#[test]
fn test_caption_visibility_over_time() {
    let cases = vec![(false, [true, true, true]), (true, [true, true, false])];

    for (auto_hide, expected) in cases {
        let config = ChartConfig {
            auto_hide_captions: auto_hide,
            ..ChartConfig::default().with_band(Band::new(red(), red(), 0.0).with_caption("MOVE"))
        };
        let bounds = compute_layout(&config).unwrap().captions[0]
            .unwrap()
            .bounds();

        let counts: Vec<usize> = [0.0, 1.0, config.animation_duration]
            .into_iter()
            .map(|time| opaque_pixels_in(&image_for_time(&config, time).unwrap(), bounds))
            .collect();
        let visible: Vec<bool> = counts.iter().map(|&count| count > 0).collect();
        assert_eq!(visible, expected, "auto_hide = {auto_hide}, counts = {counts:?}");
        assert_eq!(counts[0], counts[1]);
    }
}

#[test]
fn test_non_finite_duration_fails_before_drawing() {
    for duration in [f64::INFINITY, f64::NAN, -1.0] {
        let config = ChartConfig {
            animation_duration: duration,
            ..single_band(1.0)
        };
        assert!(matches!(image(&config), Err(RenderError::InvalidDuration(_))));
        assert!(matches!(
            image_for_time(&config, 0.5),
            Err(RenderError::InvalidDuration(_))
        ));
        assert!(matches!(
            animated_image(&config),
            Err(RenderError::InvalidDuration(_))
        ));
    }
}

#[test]
fn test_non_finite_time_is_rejected() {
    let config = single_band(1.0);
    for time in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            image_for_time(&config, time),
            Err(RenderError::InvalidTime(_))
        ));
    }
}

#[test]
fn test_non_finite_band_value_is_rejected() {
    let config = single_band(f64::INFINITY);
    assert!(matches!(
        image_for_time(&config, 0.0),
        Err(RenderError::InvalidValue { index: 0, .. })
    ));
    assert!(matches!(
        animated_image(&config),
        Err(RenderError::InvalidValue { index: 0, .. })
    ));
}

#[test]
fn test_renderer_draws_nan_time_as_first_frame() {
    let renderer = ringchart::FrameRenderer::new(single_band(1.0)).unwrap();
    let frame = renderer.render(f64::NAN).unwrap();
    assert_eq!(frame, renderer.render(0.0).unwrap());
}
