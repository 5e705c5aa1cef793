//! A week of windows in one batch, and the refraction models side by side.

use brahma_muhurat::{
    AtmosphericConditions, BatchItem, BatchRequest, CalculatorConfig, MuhuratCalculator,
    RefractionModel, RefractionRequest, TraditionType, refraction_arcminutes,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let calculator = MuhuratCalculator::new(
        CalculatorConfig::default().with_tradition(TraditionType::Dynamic),
    );

    // London around the June solstice; one date is deliberately invalid
    let batch = BatchRequest::new(
        51.5074,
        -0.1278,
        ["2024-06-18", "2024-06-19", "2024-06-31", "June 21, 2024", "22/06/2024"],
        "Europe/London",
    );

    println!("Dynamic Brahma Muhurat, London");
    for item in calculator.calculate_batch(&batch) {
        match item {
            BatchItem::Success(report) => println!(
                "  {}  {} - {}  ({} min)",
                report.date,
                report.muhurat.start.local_time,
                report.muhurat.end.local_time,
                report.muhurat.duration.minutes
            ),
            BatchItem::Failure { date, error } => println!("  {date}  error: {error}"),
        }
    }

    println!("\nRefraction (arc-minutes) at standard conditions");
    let conditions = AtmosphericConditions::standard();
    print!("  {:>7}", "alt");
    for model in RefractionModel::ALL {
        print!(" {:>12}", model.as_str());
    }
    println!();
    for altitude in [-0.833, 0.0, 2.0, 5.0, 10.0, 30.0, 60.0] {
        print!("  {altitude:>6.3}°");
        for model in RefractionModel::ALL {
            print!(" {:>12.3}", refraction_arcminutes(*model, altitude, &conditions)?);
        }
        println!();
    }

    let humid = RefractionRequest {
        altitude: 0.0,
        pressure: Some(1005.0),
        temperature: Some(32.0),
        humidity: Some(0.9),
    };
    let report = calculator.calculate_refraction(&humid)?;
    println!(
        "\nHorizon refraction on a hot humid morning: {:.2}' ({:.4}°)",
        report.refraction.arcminutes, report.refraction.degrees
    );

    Ok(())
}
