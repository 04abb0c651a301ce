use std::path::{Path, PathBuf};

use propval::error::{ArtifactLoadError, DatasetLoadError, Error, InvalidFeatureError};
use propval::models::*;
use propval::PredictionService;
use speculate2::speculate;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture_service() -> PredictionService {
    PredictionService::initialize(&fixture("model.json"), &fixture("melb_sample.csv"))
        .expect("Failed to load fixture service")
}

fn richmond_house() -> FeatureRecord {
    FeatureRecord {
        landsize: 500.0,
        property_type: PropertyType::House,
        bedroom2: 3,
        suburb: "Richmond".to_string(),
        car: 1,
        bathroom: 2,
        building_area: 150.0,
    }
}

speculate! {
    before {
        let service = load_fixture_service();
    }

    describe "initialize" {
        it "records the artifact source and summary" {
            let info = service.model_info();
            assert_eq!(info.summary.kind, "random_forest");
            assert_eq!(info.summary.trees, 2);
            assert_eq!(info.summary.max_depth, 3);
            assert_eq!(info.summary.target, "Price");
            assert_eq!(info.columns, FeatureRecord::COLUMNS);
            assert!(info.source.as_deref().unwrap().ends_with("model.json"));
            assert!(service.is_strict());
        }

        it "fails with ArtifactLoadError for a missing model" {
            let result = PredictionService::initialize(
                Path::new("/nonexistent/model.json"),
                &fixture("melb_sample.csv"),
            );
            assert!(matches!(result, Err(Error::ArtifactLoad(ArtifactLoadError::Io { .. }))));
        }

        it "fails with ArtifactLoadError for a corrupt model" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("model.json");
            std::fs::write(&path, b"\x80\x04\x95joblib").expect("Failed to write model");

            let result = PredictionService::initialize(&path, &fixture("melb_sample.csv"));
            assert!(matches!(result, Err(Error::ArtifactLoad(_))));
        }

        it "fails with ArtifactLoadError for an incompatible version" {
            let raw = std::fs::read_to_string(fixture("model.json")).expect("Failed to read fixture");
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("model.json");
            std::fs::write(&path, raw.replace("\"version\": 1", "\"version\": 7"))
                .expect("Failed to write model");

            let result = PredictionService::initialize(&path, &fixture("melb_sample.csv"));
            assert!(matches!(
                result,
                Err(Error::ArtifactLoad(ArtifactLoadError::IncompatibleVersion { found: 7, .. }))
            ));
        }

        it "fails with DatasetLoadError for a dataset without a Suburb column" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("data.csv");
            std::fs::write(&path, "Address,Price\n85 Turner St,1480000\n").expect("Failed to write csv");

            let result = PredictionService::initialize(&fixture("model.json"), &path);
            assert!(matches!(
                result,
                Err(Error::DatasetLoad(DatasetLoadError::MissingColumn(_)))
            ));
        }

        it "fails with DatasetLoadError for a missing dataset" {
            let result = PredictionService::initialize(
                &fixture("model.json"),
                Path::new("/nonexistent/melb.csv"),
            );
            assert!(matches!(result, Err(Error::DatasetLoad(DatasetLoadError::Io { .. }))));
        }
    }

    describe "list_known_suburbs" {
        it "returns sorted unique non-empty suburbs" {
            let suburbs = service.list_known_suburbs();
            assert_eq!(suburbs, ["Abbotsford", "Brunswick", "Richmond"]);
            assert!(suburbs.windows(2).all(|w| w[0] < w[1]));
            assert!(suburbs.iter().all(|s| !s.is_empty()));
        }

        it "defaults the selection to Richmond" {
            assert_eq!(service.known_suburbs().default_selection(), Some("Richmond"));
        }
    }

    describe "predict" {
        it "matches the recorded baseline for a Richmond house" {
            let price = service.predict(&richmond_house()).expect("Prediction failed");
            assert_eq!(price, 1_200_000.0);
        }

        it "is deterministic" {
            let record = richmond_house();
            let first = service.predict(&record).expect("Prediction failed");
            for _ in 0..50 {
                assert_eq!(service.predict(&record).expect("Prediction failed"), first);
            }
        }

        it "returns finite non-negative prices across the input ranges" {
            for property_type in PropertyType::ALL {
                for suburb in service.list_known_suburbs() {
                    for (landsize, building_area) in [(0.0, 0.0), (350.0, 90.0), (10_000.0, 1_000.0)] {
                        let record = FeatureRecord {
                            landsize,
                            property_type,
                            bedroom2: 10,
                            suburb: suburb.clone(),
                            car: 0,
                            bathroom: 10,
                            building_area,
                        };
                        let price = service.predict(&record).expect("Prediction failed");
                        assert!(price.is_finite() && price >= 0.0, "{:?} -> {}", record, price);
                    }
                }
            }
        }

        it "handles a degenerate empty lot" {
            let record = FeatureRecord {
                landsize: 0.0,
                bedroom2: 0,
                car: 0,
                bathroom: 0,
                building_area: 0.0,
                ..richmond_house()
            };
            assert_eq!(service.predict(&record).expect("Prediction failed"), 825_000.0);
        }

        it "prices a small Abbotsford unit" {
            let record = FeatureRecord {
                landsize: 200.0,
                property_type: PropertyType::Unit,
                bedroom2: 2,
                suburb: "Abbotsford".to_string(),
                car: 1,
                bathroom: 1,
                building_area: 80.0,
            };
            assert_eq!(service.predict(&record).expect("Prediction failed"), 650_000.0);
        }

        it "rejects an unknown suburb" {
            let record = FeatureRecord {
                suburb: "Nonexistent Suburb".to_string(),
                ..richmond_house()
            };
            let err = service.predict(&record).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidFeature(InvalidFeatureError::UnknownSuburb(ref s)) if s == "Nonexistent Suburb"
            ));
        }

        it "rejects out-of-range values" {
            let record = FeatureRecord {
                landsize: 10_000.5,
                ..richmond_house()
            };
            assert!(matches!(
                service.predict(&record),
                Err(Error::InvalidFeature(InvalidFeatureError::OutOfRange { field: "Landsize", .. }))
            ));
        }

        it "passes an unknown suburb to the model when lenient" {
            let lenient = load_fixture_service().with_strict_validation(false);
            let record = FeatureRecord {
                suburb: "Nonexistent Suburb".to_string(),
                ..richmond_house()
            };
            // every suburb indicator is zero, so the first tree takes its non-Richmond leaf
            assert_eq!(lenient.predict(&record).expect("Prediction failed"), 1_025_000.0);
        }
    }
}
