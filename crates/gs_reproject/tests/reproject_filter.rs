// crates/gs_reproject/tests/reproject_filter.rs

//! 重投影过滤器集成测试
//! 覆盖打包/逐点两条路径的一致性以及整批失败时的原样保留

use gs_foundation::PrecisionModel;
use gs_geo::prelude::*;
use gs_reproject::prelude::*;

fn resolve(source: u32, target: u32, options: &TransformOptions) -> TransformNode {
    Resolver::default()
        .resolve(
            &Crs::from_epsg(source).unwrap(),
            &Crs::from_epsg(target).unwrap(),
            options,
        )
        .unwrap()
}

/// 北德一带的十个点（纬度在前），第 4 个纬度越界
fn batch_with_bad_point() -> Vec<Coord> {
    (0..10)
        .map(|i| {
            let lat = if i == 4 { 123.0 } else { 53.0 + 0.1 * f64::from(i) };
            Coord::xy(lat, 9.0 + 0.05 * f64::from(i))
        })
        .collect()
}

fn sample_rd_points() -> Vec<Coord> {
    vec![
        Coord::xy(121_793.919, 486_901.274),
        Coord::xyz(155_000.0, 463_000.0, 12.5),
        Coord::xy(92_565.0, 437_530.0),
        Coord::xyzt(233_883.0, 582_065.0, -3.0, 2021.25),
        Coord::xy(176_000.0, 317_000.0),
    ]
}

/// 打包快速路径与逐点路径的 X/Y 输出逐位相同
#[test]
fn test_packed_matches_generic() {
    let node = resolve(28992, 4326, &TransformOptions::default());
    let points = sample_rd_points();

    for precision in [
        PrecisionModel::Floating,
        PrecisionModel::FloatingSingle,
        PrecisionModel::fixed(1e7),
    ] {
        for ordinates in [Ordinates::Xy, Ordinates::Xyz, Ordinates::Xyzt] {
            let filter = ReprojectFilter::new(node.clone(), precision);

            let mut packed = PackedSequence::from_coords(ordinates, &points);
            filter.packed().filter_packed(&mut packed).unwrap();

            let mut array = CoordinateArraySequence::from_coords(ordinates, &points);
            filter.generic().filter(&mut array).unwrap();

            assert_eq!(packed.len(), array.len());
            for i in 0..packed.len() {
                let a = packed.get(i);
                let b = array.get(i);
                assert_eq!(a.x.to_bits(), b.x.to_bits(), "{precision} {ordinates} #{i}");
                assert_eq!(a.y.to_bits(), b.y.to_bits(), "{precision} {ordinates} #{i}");
                assert!(a.same_as(&b));
            }
        }
    }
}

/// 调度过滤器按存储选择实现，结果与直接调用一致
#[test]
fn test_dispatch_selects_fast_path() {
    let node = resolve(25832, 25833, &TransformOptions::default());
    let points = vec![
        Coord::xyz(500_000.0, 6_000_000.0, 40.0),
        Coord::xyz(650_000.0, 5_800_000.0, 0.0),
    ];
    let filter = ReprojectFilter::new(node, PrecisionModel::fixed(1000.0));

    let mut via_trait = PackedSequence::from_coords(Ordinates::Xyz, &points);
    filter.filter(&mut via_trait).unwrap();
    let mut direct = PackedSequence::from_coords(Ordinates::Xyz, &points);
    filter.packed().filter_packed(&mut direct).unwrap();
    assert_eq!(via_trait, direct);

    let mut plain = points.clone();
    filter.filter(&mut plain).unwrap();
    for (i, c) in plain.iter().enumerate() {
        assert_eq!(c.x, via_trait.get(i).x);
        assert_eq!(c.z, points[i].z);
    }
}

/// 第 4 个点越界：整批失败，报告原始下标与坐标，打包数组不变
#[test]
fn test_batch_failure_packed() {
    let node = resolve(4326, 32632, &TransformOptions::strict());
    let points = batch_with_bad_point();
    let mut seq = PackedSequence::from_coords(Ordinates::Xy, &points);
    let before = seq.clone();

    let err = reproject_sequence(&mut seq, &node, &PrecisionModel::Floating).unwrap_err();
    match err {
        ReprojectError::ReprojectionFailed { index, point } => {
            assert_eq!(index, 4);
            assert!(point.same_as(&points[4]));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(seq, before);
}

/// 同一场景走逐点路径，同样不修改任何点
#[test]
fn test_batch_failure_generic() {
    let node = resolve(4326, 32632, &TransformOptions::strict());
    let points = batch_with_bad_point();
    let mut seq = CoordinateArraySequence::from_coords(Ordinates::Xy, &points);

    let err = reproject_sequence(&mut seq, &node, &PrecisionModel::Floating).unwrap_err();
    assert_eq!(err.failed_index(), Some(4));
    for (i, p) in points.iter().enumerate() {
        assert!(seq.get(i).same_as(p), "point {i} modified");
    }
}

/// 去掉越界点后整批成功
#[test]
fn test_batch_success_after_removing_bad_point() {
    let node = resolve(4326, 32632, &TransformOptions::strict());
    let mut points = batch_with_bad_point();
    points.remove(4);
    let mut seq = PackedSequence::from_coords(Ordinates::Xy, &points);
    reproject_sequence(&mut seq, &node, &PrecisionModel::fixed(1000.0)).unwrap();
    for i in 0..seq.len() {
        let c = seq.get(i);
        assert!(c.x > 300_000.0 && c.x < 700_000.0, "easting={}", c.x);
        assert!(c.y > 5_800_000.0 && c.y < 6_100_000.0, "northing={}", c.y);
    }
}

/// 逆向过滤：UTM -> 经纬度，再正向回到原值
#[test]
fn test_inverse_direction_round_trip() {
    let node = resolve(4326, 32632, &TransformOptions::strict());
    let original = vec![Coord::xy(500_000.0, 6_000_000.0), Coord::xy(480_000.0, 5_900_000.0)];
    let mut seq = CoordinateArraySequence::from_coords(Ordinates::Xy, &original);

    ReprojectFilter::new(node.clone(), PrecisionModel::Floating)
        .with_direction(Direction::Inverse)
        .filter(&mut seq)
        .unwrap();
    assert!((seq.get(0).x - 54.1).abs() < 0.1, "lat={}", seq.get(0).x);

    ReprojectFilter::new(node, PrecisionModel::fixed(1000.0))
        .filter(&mut seq)
        .unwrap();
    for (i, p) in original.iter().enumerate() {
        assert!(seq.get(i).approx_eq(p, 1e-3));
    }
}

/// 工厂创建的序列可直接过滤
#[test]
fn test_factory_sequence() {
    let node = resolve(4326, 3857, &TransformOptions::default());
    let factory = SequenceFactory::new(3857, PrecisionModel::fixed(100.0), SequenceLayout::Array);
    let mut seq = factory.from_coords(Ordinates::Xy, &[Coord::xy(0.0, 0.0), Coord::xy(0.0, 180.0)]);
    reproject_sequence(seq.as_mut(), &node, &factory.precision()).unwrap();
    assert_eq!(seq.get(0).x, 0.0);
    assert!((seq.get(1).x - 20_037_508.34).abs() < 1e-6);
}
