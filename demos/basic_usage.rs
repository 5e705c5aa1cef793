//! Brahma Muhurat for one place and date, under every tradition.

use brahma_muhurat::{
    CalculationRequest, CalculatorConfig, CoordinateFormat, Location, MuhuratCalculator,
    PrecisionTier, TraditionType,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let varanasi = Location::new(25.317644, 83.005495, 80.0)?;

    let request = CalculationRequest::new(
        varanasi.latitude(),
        varanasi.longitude(),
        "2024-02-18",
        "Asia/Kolkata",
    )
    .with_elevation(varanasi.elevation())
    .with_atmosphere(1008.0, 18.0, 0.6);

    println!(
        "Brahma Muhurat at {} on 18 February 2024\n",
        varanasi.format(CoordinateFormat::DegreesMinutesSeconds)
    );

    for tradition in TraditionType::ALL {
        let calculator = MuhuratCalculator::new(
            CalculatorConfig::default()
                .with_precision(PrecisionTier::Maximum)
                .with_tradition(*tradition),
        );
        let report = calculator.calculate(&request)?;
        println!(
            "  {:<9} {} - {} ({} min)",
            tradition.to_string(),
            report.muhurat.start.local_time,
            report.muhurat.end.local_time,
            report.muhurat.duration.minutes
        );
    }

    let report = MuhuratCalculator::new(
        CalculatorConfig::default().with_precision(PrecisionTier::Maximum),
    )
    .calculate(&request)?;
    let data = &report.astronomical_data;

    println!("\nSunrise: {} (UTC{})", report.sunrise.local_time, data.utc_offset);
    println!("  Engine: {}{}", data.precision, if data.degraded { " (degraded)" } else { "" });
    if let Some(declination) = data.solar_declination {
        println!("  Declination: {declination:.3}°");
    }
    println!("  Azimuth: {:.2}°", data.sunrise_azimuth);
    println!(
        "  Refraction: {:.2}' ({:+.1} s)",
        data.refraction_arcminutes, data.time_correction_seconds
    );
    if let Some(night) = data.night_length_minutes {
        println!("  Night length: {night:.1} min");
    }
    println!(
        "  Moon: {} ({:.0}% lit)",
        data.moon_phase.phase(),
        data.moon_phase.illumination() * 100.0
    );

    Ok(())
}
