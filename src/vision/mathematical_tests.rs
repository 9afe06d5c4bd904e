/// 視野數學性質測試
///
/// 角度運算、射線命中性質、光照疊加與視覺模式判定
#[cfg(test)]
mod tests {
    use rand::Rng;
    use vek::Vec2;

    use crate::config::SceneEnvironment;
    use crate::vision::{
        GeometryUtils, LightLevel, LightResolver, LightSource, Raycaster, TokenVision,
        VisionBlocker, VisionMode, VisionProfile, VisionResolver,
    };

    fn dark_env() -> SceneEnvironment {
        SceneEnvironment::default()
    }

    fn lit_env() -> SceneEnvironment {
        SceneEnvironment {
            global_light: true,
            ..SceneEnvironment::default()
        }
    }

    #[test]
    fn test_normalize_angle_range() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let angle: f32 = rng.random_range(-100.0..100.0);
            let normalized = GeometryUtils::normalize_angle(angle);
            assert!(normalized >= 0.0);
            assert!(normalized < 2.0 * std::f32::consts::PI + 1e-4);
        }
    }

    #[test]
    fn test_angle_difference_wraps() {
        let pi2 = 2.0 * std::f32::consts::PI;
        let diff = GeometryUtils::angle_difference(0.1, pi2 - 0.1);
        assert!((diff - -0.2).abs() < 1e-4);

        let diff = GeometryUtils::angle_difference(pi2 - 0.1, 0.1);
        assert!((diff - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_feet_pixel_conversion() {
        let env = SceneEnvironment::default(); // 50 像素一格（5 呎）
        assert!((env.feet_to_px(5.0) - 50.0).abs() < 1e-4);
        assert!((env.px_to_feet(100.0) - 10.0).abs() < 1e-4);

        // 全域預設環境在找不到設定檔時使用內建值
        assert!(crate::config::SCENE_ENV.grid_size_px > 0.0);
    }

    #[test]
    fn test_segments_intersect() {
        let hit = GeometryUtils::segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        )
        .expect("交叉線段應有交點");
        assert!(hit.distance(Vec2::new(5.0, 5.0)) < 1e-4);

        // 平行線段無交點
        assert!(GeometryUtils::segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        )
        .is_none());

        assert!((GeometryUtils::distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounds_queries() {
        use crate::vision::Bounds;

        let bounds = Bounds::from_points(&[
            Vec2::new(10.0, 20.0),
            Vec2::new(-5.0, 0.0),
            Vec2::new(3.0, 40.0),
        ])
        .expect("非空點集必有包圍盒");

        assert!((bounds.width() - 15.0).abs() < 1e-4);
        assert!((bounds.height() - 40.0).abs() < 1e-4);
        assert!(bounds.contains_point(Vec2::new(0.0, 10.0)));
        assert!(!bounds.contains_point(Vec2::new(11.0, 10.0)));
        assert!(Bounds::from_points(&[]).is_none());
    }

    /// 命中點必須落在某條牆線段上，且距離不超過射線上限
    #[test]
    fn test_ray_hit_lies_on_segment() {
        let walls = vec![VisionBlocker::new(
            "box",
            vec![
                Vec2::new(-50.0, -50.0),
                Vec2::new(50.0, -50.0),
                Vec2::new(50.0, 50.0),
                Vec2::new(-50.0, 50.0),
            ],
        )];

        let mut rng = rand::rng();
        for _ in 0..100 {
            let angle: f32 = rng.random_range(0.0..std::f32::consts::TAU);
            let direction = Vec2::new(angle.cos(), angle.sin());
            let hit = Raycaster::cast(Vec2::new(0.0, 0.0), direction, &walls, 200.0)
                .expect("封閉盒內的射線必定命中");

            assert!(hit.distance <= 200.0);
            assert!(hit.distance >= 49.9);

            let segments = walls[0].segments();
            let (a, b) = segments[hit.segment_index];
            assert!(GeometryUtils::point_to_segment_distance(hit.point, a, b) < 1e-3);

            let reconstructed = Vec2::new(0.0, 0.0) + direction * hit.distance;
            assert!(reconstructed.distance(hit.point) < 1e-3);
        }
    }

    #[test]
    fn test_mode_resolution_priority() {
        // 列舉的優先度排序與判定鏈一致
        assert!(VisionMode::Truesight.priority() > VisionMode::Blindsight.priority());
        assert!(VisionMode::Blindsight.priority() > VisionMode::Tremorsense.priority());
        assert!(VisionMode::Tremorsense.priority() > VisionMode::Darkvision.priority());
        assert!(VisionMode::Darkvision.priority() > VisionMode::Basic.priority());

        let profile = VisionProfile::new(60.0)
            .with_truesight(30.0)
            .with_darkvision(60.0);
        assert_eq!(
            VisionResolver::resolve_mode(&profile, LightLevel::Dark),
            VisionMode::Truesight
        );

        let profile = VisionProfile::new(60.0)
            .with_blindsight(10.0)
            .with_tremorsense(30.0);
        assert_eq!(
            VisionResolver::resolve_mode(&profile, LightLevel::Bright),
            VisionMode::Blindsight
        );

        // 黑暗視覺只在微光或黑暗中啟動
        let profile = VisionProfile::new(60.0).with_darkvision(60.0);
        assert_eq!(
            VisionResolver::resolve_mode(&profile, LightLevel::Dim),
            VisionMode::Darkvision
        );
        assert_eq!(
            VisionResolver::resolve_mode(&profile, LightLevel::Bright),
            VisionMode::Basic
        );

        // 沒有特殊感官時採用明確指定的模式
        let mut profile = VisionProfile::new(60.0);
        profile.mode = Some(VisionMode::Darkvision);
        assert_eq!(
            VisionResolver::resolve_mode(&profile, LightLevel::Bright),
            VisionMode::Darkvision
        );
        profile.mode = None;
        assert_eq!(
            VisionResolver::resolve_mode(&profile, LightLevel::Bright),
            VisionMode::Basic
        );
    }

    #[test]
    fn test_wall_filter_by_mode() {
        let walls = vec![
            VisionBlocker::new("solid", vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]),
            VisionBlocker::new("illusion", vec![Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)])
                .with_flags(true, false),
            VisionBlocker::new("window", vec![Vec2::new(0.0, 2.0), Vec2::new(1.0, 2.0)])
                .with_flags(false, true),
        ];

        let basic = VisionResolver::wall_filter(VisionMode::Basic, &walls);
        assert_eq!(basic.len(), 2); // solid + illusion

        let truesight = VisionResolver::wall_filter(VisionMode::Truesight, &walls);
        assert_eq!(truesight.len(), 1);
        assert_eq!(truesight[0].id, "solid");

        let tremorsense = VisionResolver::wall_filter(VisionMode::Tremorsense, &walls);
        assert!(tremorsense.is_empty());
    }

    /// 黑暗視覺的距離單調性：60 呎黑暗視覺在黑暗中 55 呎可見、65 呎不可見
    #[test]
    fn test_darkvision_range_monotonicity() {
        let env = dark_env(); // 格線 50px，每呎 10px
        let profile = VisionProfile::new(120.0).with_darkvision(60.0);
        let viewer = TokenVision::new("viewer", Vec2::new(0.0, 0.0), profile);
        let target_profile = VisionProfile::new(60.0);

        let at_55ft = TokenVision::new("t1", Vec2::new(550.0, 0.0), target_profile.clone());
        assert!(VisionResolver::can_see(&viewer, &at_55ft, &[], &[], &env));

        let at_65ft = TokenVision::new("t2", Vec2::new(650.0, 0.0), target_profile.clone());
        assert!(!VisionResolver::can_see(&viewer, &at_65ft, &[], &[], &env));

        // 亮光下改用一般視覺，55 呎在 120 呎視距內可見
        let lit = lit_env();
        assert!(VisionResolver::can_see(&viewer, &at_55ft, &[], &[], &lit));
    }

    #[test]
    fn test_basic_vision_fails_in_darkness() {
        let env = dark_env();
        let viewer = TokenVision::new("viewer", Vec2::new(0.0, 0.0), VisionProfile::new(60.0));
        let target = TokenVision::new("t", Vec2::new(100.0, 0.0), VisionProfile::new(60.0));

        assert!(!VisionResolver::can_see(&viewer, &target, &[], &[], &env));

        // 目標被光源照亮後可見
        let lights = vec![LightSource::new(Vec2::new(100.0, 0.0), 20.0, 20.0)];
        assert!(VisionResolver::can_see(&viewer, &target, &[], &lights, &env));
    }

    /// 光照疊加取最大值：任一光源的亮光即蓋過其它光源的微光
    #[test]
    fn test_light_stacking_takes_max() {
        let env = dark_env();
        let sources = vec![
            LightSource::new(Vec2::new(0.0, 0.0), 20.0, 20.0),
            LightSource::new(Vec2::new(400.0, 0.0), 20.0, 20.0),
        ];

        // 距 a 30 呎（微光）、距 b 10 呎（亮光）=> 亮光
        let level = LightResolver::light_level_at(Vec2::new(300.0, 0.0), &sources, &[], &env);
        assert_eq!(level, LightLevel::Bright);

        // 兩個光源都只照到微光 => 微光
        let dim_only = vec![LightSource::new(Vec2::new(0.0, 0.0), 20.0, 20.0)];
        let level = LightResolver::light_level_at(Vec2::new(300.0, 0.0), &dim_only, &[], &env);
        assert_eq!(level, LightLevel::Dim);

        // 加入一個照不到的光源不改變結果
        let mut with_extra = sources.clone();
        with_extra.push(LightSource::new(Vec2::new(99999.0, 0.0), 20.0, 20.0));
        let level = LightResolver::light_level_at(Vec2::new(300.0, 0.0), &with_extra, &[], &env);
        assert_eq!(level, LightLevel::Bright);
    }

    #[test]
    fn test_global_light_overrides_sources() {
        let env = lit_env();
        let level = LightResolver::light_level_at(Vec2::new(12345.0, 0.0), &[], &[], &env);
        assert_eq!(level, LightLevel::Bright);
    }

    #[test]
    fn test_light_blocked_by_wall_contributes_nothing() {
        let env = dark_env();
        let sources = vec![LightSource::new(Vec2::new(0.0, 0.0), 20.0, 20.0)];
        let walls = vec![VisionBlocker::new(
            "w",
            vec![Vec2::new(50.0, -50.0), Vec2::new(50.0, 50.0)],
        )];

        // 10 呎內本應是亮光，但被阻光牆擋住
        let level = LightResolver::light_level_at(Vec2::new(100.0, 0.0), &sources, &walls, &env);
        assert_eq!(level, LightLevel::Dark);

        // 不阻光的牆不影響光照
        let transparent = vec![VisionBlocker::new(
            "w",
            vec![Vec2::new(50.0, -50.0), Vec2::new(50.0, 50.0)],
        )
        .with_flags(false, true)];
        let level =
            LightResolver::light_level_at(Vec2::new(100.0, 0.0), &sources, &transparent, &env);
        assert_eq!(level, LightLevel::Bright);
    }

    /// 真實視覺把純阻光的幻象牆視為透明
    #[test]
    fn test_truesight_sees_through_light_only_wall() {
        let env = lit_env();
        let walls = vec![VisionBlocker::new(
            "illusion",
            vec![Vec2::new(50.0, -50.0), Vec2::new(50.0, 50.0)],
        )
        .with_flags(true, false)];

        let target = TokenVision::new("t", Vec2::new(100.0, 0.0), VisionProfile::new(60.0));

        let basic = TokenVision::new("basic", Vec2::new(0.0, 0.0), VisionProfile::new(60.0));
        assert!(!VisionResolver::can_see(&basic, &target, &walls, &[], &env));

        let truesight = TokenVision::new(
            "true",
            Vec2::new(0.0, 0.0),
            VisionProfile::new(60.0).with_truesight(60.0),
        );
        assert!(VisionResolver::can_see(&truesight, &target, &walls, &[], &env));
    }

    /// 震動感知無視牆，但只偵測同高度目標
    #[test]
    fn test_tremorsense_ignores_walls_but_not_elevation() {
        let env = dark_env();
        let walls = vec![VisionBlocker::new(
            "w",
            vec![Vec2::new(50.0, -50.0), Vec2::new(50.0, 50.0)],
        )];
        let viewer = TokenVision::new(
            "v",
            Vec2::new(0.0, 0.0),
            VisionProfile::new(60.0).with_tremorsense(60.0),
        );

        let grounded = TokenVision::new("t", Vec2::new(100.0, 0.0), VisionProfile::new(60.0));
        assert!(VisionResolver::can_see(&viewer, &grounded, &walls, &[], &env));

        let flying = grounded.clone().with_elevation(10.0);
        assert!(!VisionResolver::can_see(&viewer, &flying, &walls, &[], &env));
    }

    #[test]
    fn test_facing_cone_excludes_rear_target() {
        let env = lit_env();
        let viewer = TokenVision::new(
            "v",
            Vec2::new(0.0, 0.0),
            VisionProfile::new(60.0).with_cone(90.0, 0.0),
        );

        let front = TokenVision::new("f", Vec2::new(100.0, 0.0), VisionProfile::new(60.0));
        assert!(VisionResolver::can_see(&viewer, &front, &[], &[], &env));
        assert!(VisionResolver::point_in_facing_cone(&viewer, front.position));

        let behind = TokenVision::new("b", Vec2::new(-100.0, 0.0), VisionProfile::new(60.0));
        assert!(!VisionResolver::can_see(&viewer, &behind, &[], &[], &env));
        assert!(!VisionResolver::point_in_facing_cone(&viewer, behind.position));
    }

    #[test]
    fn test_disabled_vision_never_sees() {
        let env = lit_env();
        let mut profile = VisionProfile::new(60.0);
        profile.enabled = false;
        let viewer = TokenVision::new("v", Vec2::new(0.0, 0.0), profile);
        let target = TokenVision::new("t", Vec2::new(10.0, 0.0), VisionProfile::new(60.0));

        assert!(!VisionResolver::can_see(&viewer, &target, &[], &[], &env));
    }

    #[test]
    fn test_effective_range_follows_mode() {
        let profile = VisionProfile::new(120.0).with_darkvision(60.0);
        assert!(
            (VisionResolver::effective_range(&profile, VisionMode::Darkvision) - 60.0).abs()
                < 1e-6
        );
        assert!(
            (VisionResolver::effective_range(&profile, VisionMode::Basic) - 120.0).abs() < 1e-6
        );
        // 未獲得的感官距離為 0
        assert!(VisionResolver::effective_range(&profile, VisionMode::Blindsight) <= 0.0);
    }
}
