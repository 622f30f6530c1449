use geo::{Area, Geometry, GeometryCollection, Line, MultiPolygon, Rect, coord};
use polars::{df, prelude::DataFrame};

use ruralgap::{
    columns, run, Boundary, Features, Frame, GeoId, Inputs, PipelineConfig, StaticBoundaries,
};

const COVERED: &str = "530330001001";
const DISJOINT: &str = "530330002001";
const PARTIAL: &str = "530330003001";
const OTHER_COUNTY: &str = "530610004001";
const NO_LAND: &str = "530330005001";
const COLLECTION: &str = "530330006001";

fn rect(x: f64, y: f64, w: f64, h: f64) -> MultiPolygon<f64> {
    Rect::new(coord! { x: x, y: y }, coord! { x: x + w, y: y + h }).to_polygon().into()
}

fn shape(x: f64, y: f64, w: f64, h: f64) -> Geometry<f64> {
    Geometry::MultiPolygon(rect(x, y, w, h))
}

fn config() -> PipelineConfig {
    PipelineConfig {
        frame: Frame::UTM_10N,
        state: "WA".into(),
        counties: vec!["King".into()],
        selected_columns: ["GEOID10", "CBSA_Name", "Ac_Land", "TotPop", "R_PCTLOWWAGE", "E_PctLowWage"]
            .iter().map(|c| c.to_string()).collect(),
        ..PipelineConfig::default()
    }
}

fn king(frame: Frame, geometry: Geometry<f64>) -> StaticBoundaries {
    StaticBoundaries::new(frame, vec![Boundary {
        state: "53".into(),
        county: "033".into(),
        name: "King".into(),
        geometry,
    }])
}

fn block_groups() -> Features {
    let data = df!(
        "GEOID10" => &[COVERED, DISJOINT, PARTIAL, OTHER_COUNTY, NO_LAND, COLLECTION],
        "STATEFP" => &["53"; 6],
        "COUNTYFP" => &["033", "033", "033", "061", "033", "033"],
        "CBSA_Name" => &["Seattle-Tacoma-Bellevue, WA"; 6],
        "Ac_Land" => &[2.5, 2.5, 2.5, 2.5, 0.0, 0.6],
        "TotPop" => &[900i64, 1200, 700, 800, 0, 300],
        "R_PCTLOWWAGE" => &[Some(0.1), Some(0.5), Some(0.9), Some(0.2), Some(0.2), Some(0.5)],
        "E_PctLowWage" => &[Some(0.3), None, Some(0.2), Some(0.4), Some(0.4), Some(0.25)],
    ).unwrap();

    let collection = Geometry::GeometryCollection(GeometryCollection::new_from(vec![
        shape(600.0, -20.0, 50.0, 50.0),
        Geometry::Line(Line::new(coord! { x: 650.0, y: 30.0 }, coord! { x: 680.0, y: 60.0 })),
    ]));

    let geoms = vec![
        shape(100.0, 100.0, 100.0, 100.0), // inside the first center
        shape(20.0, 600.0, 100.0, 100.0),  // clear of both centers
        shape(300.0, 0.0, 100.0, 100.0),   // 60% under the second center
        shape(100.0, 500.0, 100.0, 100.0),
        shape(800.0, 100.0, 100.0, 100.0),
        collection,
    ];
    Features::new(Frame::UTM_10N, data, geoms).unwrap()
}

fn population_centers() -> Features {
    Features::from_geometries(Frame::UTM_10N, vec![
        shape(50.0, 50.0, 200.0, 200.0),
        shape(300.0, -50.0, 60.0, 200.0),
    ]).unwrap()
}

fn area_types() -> Features {
    let data = df!("LOCALE" => &[11i64, 41, 31]).unwrap();
    Features::new(Frame::UTM_10N, data, vec![
        shape(300.0, 0.0, 60.0, 100.0), // City, but only under the population center
        shape(360.0, 0.0, 20.0, 100.0), // Rural, 2000 m² of what is left
        shape(380.0, 0.0, 20.0, 50.0),  // Town, 1000 m²
    ]).unwrap()
}

fn ids(data: &DataFrame) -> Vec<String> {
    data.column("GEOID10").unwrap().str().unwrap().into_iter().flatten().map(str::to_string).collect()
}

#[test]
fn block_groups_are_partitioned_and_classified() {
    let boundaries = king(Frame::UTM_10N, shape(-100.0, -100.0, 1100.0, 1100.0));
    let (block_groups, centers, types) = (block_groups(), population_centers(), area_types());
    let output = run(&config(), Inputs {
        boundaries: &boundaries,
        block_groups: &block_groups,
        population_centers: &centers,
        area_types: &types,
    }).unwrap();

    assert_eq!(ids(output.study_block_groups.data()), vec![COVERED, DISJOINT, PARTIAL, COLLECTION]);
    assert_eq!(output.report.filtered_by_county, 1);
    assert_eq!(output.report.filtered_by_land_area, 1);

    assert_eq!(ids(output.outside.data()), vec![DISJOINT, COLLECTION]);
    assert_eq!(ids(output.intersecting.data()), vec![COVERED, PARTIAL]);
    assert_eq!(ids(output.partially_outside.data()), vec![PARTIAL]);
    assert_eq!(output.report.fully_covered, vec![GeoId::new(COVERED)]);
    assert!(output.report.locale_unresolved.is_empty());
    assert_eq!(output.population_centers.pieces().len(), 2);
}

#[test]
fn fully_covered_block_group_is_only_in_intersecting() {
    let boundaries = king(Frame::UTM_10N, shape(-100.0, -100.0, 1100.0, 1100.0));
    let (block_groups, centers, types) = (block_groups(), population_centers(), area_types());
    let output = run(&config(), Inputs {
        boundaries: &boundaries,
        block_groups: &block_groups,
        population_centers: &centers,
        area_types: &types,
    }).unwrap();

    let covered = GeoId::new(COVERED);
    assert!(output.intersecting.contains(&covered));
    assert!(!output.outside.contains(&covered));
    assert!(!output.partially_outside.contains(&covered));
}

#[test]
fn disjoint_block_group_is_untouched() {
    let boundaries = king(Frame::UTM_10N, shape(-100.0, -100.0, 1100.0, 1100.0));
    let (block_groups, centers, types) = (block_groups(), population_centers(), area_types());
    let output = run(&config(), Inputs {
        boundaries: &boundaries,
        block_groups: &block_groups,
        population_centers: &centers,
        area_types: &types,
    }).unwrap();

    let disjoint = GeoId::new(DISJOINT);
    assert_eq!(output.outside.geometry(&disjoint), output.study_block_groups.geometry(&disjoint));
    assert!((output.outside.geometry(&disjoint).unwrap().unsigned_area() - 10_000.0).abs() < 1e-6);
    assert!(output.outside.data().column(columns::LOCALE).is_err());

    // 0.5 is the median of the home shares, and the work share is missing.
    assert_eq!(
        output.outside.str_value(&disjoint, columns::COMBINED_WAGE_CATEGORY).unwrap().as_deref(),
        Some("Below Median_Below Median"),
    );
    assert_eq!(output.report.home_wage_median, Some(0.5));

    // Only the polygon of the mixed collection survives.
    let collection = output.outside.geometry(&GeoId::new(COLLECTION)).unwrap();
    assert_eq!(collection.0.len(), 1);
    assert!((collection.unsigned_area() - 2500.0).abs() < 1e-6);
}

#[test]
fn partially_covered_block_group_keeps_its_remainder() {
    let boundaries = king(Frame::UTM_10N, shape(-100.0, -100.0, 1100.0, 1100.0));
    let (block_groups, centers, types) = (block_groups(), population_centers(), area_types());
    let output = run(&config(), Inputs {
        boundaries: &boundaries,
        block_groups: &block_groups,
        population_centers: &centers,
        area_types: &types,
    }).unwrap();

    let partial = GeoId::new(PARTIAL);
    let remainder = output.partially_outside.geometry(&partial).unwrap();
    assert!((remainder.unsigned_area() - 4000.0).abs() < 1e-6);

    // Largest overlap against what is left, not against the original block group.
    assert_eq!(
        output.partially_outside.str_value(&partial, columns::LOCALE).unwrap().as_deref(),
        Some("Rural"),
    );
    let max_area = output.partially_outside.f64_values(columns::MAX_AREA).unwrap()[0].unwrap();
    assert!((max_area - 2000.0).abs() < 1e-6);

    assert_eq!(
        output.partially_outside.str_value(&partial, columns::COMBINED_WAGE_CATEGORY).unwrap().as_deref(),
        Some("Above Median_Below Median"),
    );
    let stats = output.summary.stats("R_PCTLOWWAGE", "Above Median_Below Median").unwrap();
    assert_eq!(stats.n, 1);
    assert_eq!(stats.median_range(), "0.90 [0.90, 0.90]");
}

#[test]
fn geographic_boundaries_are_reprojected_before_clipping() {
    // Roughly -122.5..-121.5 E, 47..48 N; the block group sits near -122.0, 47.4.
    let lonlat = Geometry::Polygon(
        Rect::new(coord! { x: -122.5, y: 47.0 }, coord! { x: -121.5, y: 48.0 }).to_polygon()
    );
    let boundaries = king(Frame::NAD83, lonlat);

    let data = df!(
        "GEOID10" => &["530330007001"],
        "STATEFP" => &["53"],
        "COUNTYFP" => &["33"],
        "CBSA_Name" => &["Seattle-Tacoma-Bellevue, WA"],
        "Ac_Land" => &[100.0],
        "TotPop" => &[1500i64],
        "R_PCTLOWWAGE" => &[0.2],
        "E_PctLowWage" => &[0.3],
    ).unwrap();
    let block_groups = Features::new(Frame::UTM_10N, data, vec![shape(570_000.0, 5_255_000.0, 1000.0, 1000.0)]).unwrap();
    let centers = Features::from_geometries(Frame::UTM_10N, vec![]).unwrap();
    let types = area_types();

    let output = run(&config(), Inputs {
        boundaries: &boundaries,
        block_groups: &block_groups,
        population_centers: &centers,
        area_types: &types,
    }).unwrap();

    assert_eq!(output.report.reprojected_layers, vec!["study area"]);
    assert_eq!(output.study_area.frame(), Frame::UTM_10N);
    assert_eq!(ids(output.outside.data()), vec!["530330007001"]);
    assert!((output.outside.geometries().shape(0).unsigned_area() - 1_000_000.0).abs() < 1e-3);
    assert!(output.partially_outside.is_empty());
}

#[test]
fn unknown_counties_fail_the_run() {
    let boundaries = king(Frame::UTM_10N, shape(-100.0, -100.0, 1100.0, 1100.0));
    let (block_groups, centers, types) = (block_groups(), population_centers(), area_types());
    let config = PipelineConfig { counties: vec!["Atlantis".into()], ..config() };

    let err = run(&config, Inputs {
        boundaries: &boundaries,
        block_groups: &block_groups,
        population_centers: &centers,
        area_types: &types,
    }).unwrap_err();
    assert!(matches!(err.downcast_ref::<ruralgap::Error>(), Some(ruralgap::Error::EmptyStudyArea { .. })));
}

#[test]
fn config_from_json_drives_the_run() {
    let config = PipelineConfig::from_json_str(r#"{
        "frame": 32610,
        "state": "WA",
        "counties": ["King"],
        "selected_columns": ["GEOID10", "TotPop", "R_PCTLOWWAGE", "E_PctLowWage"]
    }"#).unwrap();

    let boundaries = king(Frame::UTM_10N, shape(-100.0, -100.0, 1100.0, 1100.0));
    let (block_groups, centers, types) = (block_groups(), population_centers(), area_types());
    let output = run(&config, Inputs {
        boundaries: &boundaries,
        block_groups: &block_groups,
        population_centers: &centers,
        area_types: &types,
    }).unwrap();

    let names = output.partially_outside.data().get_column_names().into_iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec![
        "GEOID10", "TotPop", "R_PCTLOWWAGE", "E_PctLowWage",
        columns::HOME_WAGE_CATEGORY, columns::WORK_WAGE_CATEGORY, columns::COMBINED_WAGE_CATEGORY,
        columns::LOCALE, columns::MAX_AREA,
    ]);
}

#[test]
fn wage_columns_survive_a_narrow_column_selection() {
    let config = PipelineConfig {
        selected_columns: vec!["GEOID10".into(), "TotPop".into()],
        ..config()
    };

    let boundaries = king(Frame::UTM_10N, shape(-100.0, -100.0, 1100.0, 1100.0));
    let (block_groups, centers, types) = (block_groups(), population_centers(), area_types());
    let output = run(&config, Inputs {
        boundaries: &boundaries,
        block_groups: &block_groups,
        population_centers: &centers,
        area_types: &types,
    }).unwrap();

    let names = output.study_block_groups.data().get_column_names().into_iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    assert_eq!(names[..4], ["GEOID10", "TotPop", "R_PCTLOWWAGE", "E_PctLowWage"]);
    assert_eq!(output.report.home_wage_median, Some(0.5));
}

#[test]
fn population_centers_stay_inside_an_irregular_study_area() {
    let boundaries = king(Frame::UTM_10N, shape(-100.0, -100.0, 1100.0, 1100.0));
    let (block_groups, types) = (block_groups(), area_types());
    // The block groups leave 450..550 x 300..400 empty, well inside their bounding box.
    let centers = Features::from_geometries(Frame::UTM_10N, vec![
        shape(50.0, 50.0, 200.0, 200.0),
        shape(450.0, 300.0, 100.0, 100.0),
    ]).unwrap();

    let output = run(&config(), Inputs {
        boundaries: &boundaries,
        block_groups: &block_groups,
        population_centers: &centers,
        area_types: &types,
    }).unwrap();

    assert_eq!(output.population_centers.pieces().len(), 1);
    assert!((output.population_centers.union().unsigned_area() - 10_000.0).abs() < 1e-6);
}
