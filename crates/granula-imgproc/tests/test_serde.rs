#![cfg(feature = "serde")]

use granula_imgproc::border::BorderPolicy;
use granula_imgproc::dispatch::MorphologyOp;
use granula_imgproc::filter::kernels::Kernel;
use granula_imgproc::morphology::StructuringElement;
use granula_imgproc::particles::{BlobInfo, Polarity, Rect};

#[test]
fn test_pipeline_settings_from_json() -> Result<(), Box<dyn std::error::Error>> {
    let policy: BorderPolicy = serde_json::from_str(r#"{"Constant":255.0}"#)?;
    assert_eq!(policy, BorderPolicy::Constant(255.0));

    let element: StructuringElement =
        serde_json::from_str(r#"{"Ellipse":{"x_radius":3,"y_radius":2}}"#)?;
    assert_eq!(
        element,
        StructuringElement::Ellipse {
            x_radius: 3,
            y_radius: 2
        }
    );

    let op: MorphologyOp = serde_json::from_str(r#""Close""#)?;
    assert_eq!(op, MorphologyOp::Close);

    let polarity: Polarity = serde_json::from_str(r#""BlackOnWhite""#)?;
    assert_eq!(polarity, Polarity::BlackOnWhite);
    Ok(())
}

#[test]
fn test_kernel_and_blob_json() -> Result<(), Box<dyn std::error::Error>> {
    let kernel = Kernel::box_kernel(1, 2);
    let restored: Kernel = serde_json::from_str(&serde_json::to_string(&kernel)?)?;
    assert_eq!(restored, kernel);

    let blob = BlobInfo {
        rect: Rect {
            left: 1,
            top: 2,
            right: 3,
            bottom: 4,
        },
        area: 7,
        center_x: 2,
        center_y: 3,
    };
    let json = serde_json::to_value(blob)?;
    assert_eq!(json["rect"]["bottom"], 4);
    assert_eq!(json["area"], 7);
    Ok(())
}

#[test]
fn test_kernel_json_is_validated() {
    let short = r#"{"x_radius":1,"y_radius":1,"weights":[1.0],"divisor":1.0}"#;
    let err = serde_json::from_str::<Kernel>(short).unwrap_err();
    assert!(err.to_string().contains("does not fit 1 weights"));

    let zero_divisor = r#"{"x_radius":0,"y_radius":0,"weights":[1.0],"divisor":0.0}"#;
    assert!(serde_json::from_str::<Kernel>(zero_divisor).is_err());

    let huge = format!(
        r#"{{"x_radius":{},"y_radius":1,"weights":[1.0],"divisor":1.0}}"#,
        usize::MAX
    );
    assert!(serde_json::from_str::<Kernel>(&huge).is_err());

    let ok = r#"{"x_radius":1,"y_radius":0,"weights":[1.0,2.0,1.0],"divisor":4.0}"#;
    let kernel: Kernel = serde_json::from_str(ok).expect("valid kernel");
    assert_eq!(kernel.weights(), &[1.0, 2.0, 1.0]);
}
