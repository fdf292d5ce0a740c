use gemicro::material::laws::{
    isotropic_voigt_stiffness, ExponentialDamage, LameParameters, LinearElasticMicropolarDamage, YoungPoisson,
};
use gemicro::material::{
    DeformationIncrement, GradientEnhancedMicropolarLaw, MaterialRegistry, MaterialSpec, TangentMode, TimeIncrement,
};
use gemicro::tensor::{Tensor1, Tensor2};
use gemicro::ConfigurationError;
use matrixcompare::assert_scalar_eq;
use util::assert_tensor_eq;

#[test]
fn young_poisson_to_lame() {
    let lame = LameParameters::from(YoungPoisson {
        young: 100.0,
        poisson: 0.25,
    });
    assert_scalar_eq!(lame.mu, 40.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(lame.lambda, 40.0, comp = abs, tol = 1e-12);

    let c = isotropic_voigt_stiffness(&lame);
    assert_scalar_eq!(c[(0, 0)], 120.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(c[(0, 1)], 40.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(c[(3, 3)], 40.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(c[(3, 4)], 0.0, comp = abs, tol = 0.0);
}

#[test]
fn exponential_damage() {
    let damage = ExponentialDamage {
        kappa_0: 0.1,
        kappa_f: 0.5,
    };
    assert_eq!(damage.evaluate(0.05), (0.0, 0.0));
    assert_eq!(damage.evaluate(0.1), (0.0, 0.0));
    let (omega, domega) = damage.evaluate(0.6);
    assert_scalar_eq!(omega, 1.0 - (-1.0f64).exp(), comp = abs, tol = 1e-14);
    assert_scalar_eq!(domega, (-1.0f64).exp() / 0.5, comp = abs, tol = 1e-14);
}

#[test]
fn builtin_registry_lists_laws() {
    let registry = MaterialRegistry::with_builtin_laws();
    assert_eq!(registry.micropolar_law_names(), vec!["LinearElasticMicropolarDamage"]);
    assert_eq!(registry.hypoelastic_law_names(), vec!["LinearElastic"]);
    assert_eq!(
        registry.gradient_enhanced_hypoelastic_law_names(),
        vec!["GradientEnhancedLinearElasticDamage"]
    );
    assert!(MaterialRegistry::new().micropolar_law_names().is_empty());
}

#[test]
fn registry_reports_unknown_and_invalid_materials() {
    let registry = MaterialRegistry::with_builtin_laws();

    let err = registry
        .create_hypoelastic_law(&MaterialSpec::new("Rubber", [1.0]))
        .err()
        .unwrap();
    assert_eq!(
        err.downcast_ref::<ConfigurationError>(),
        Some(&ConfigurationError::UnknownMaterial {
            name: "Rubber".to_string()
        })
    );

    // Wrong parameter count
    let err = registry
        .create_hypoelastic_law(&MaterialSpec::new("LinearElastic", [1.0]))
        .err()
        .unwrap();
    assert!(matches!(
        err.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::MaterialInstantiation { .. })
    ));

    // Nonphysical Poisson ratio
    let err = registry
        .create_micropolar_law(&MaterialSpec::new(
            "LinearElasticMicropolarDamage",
            [1.0, 0.5, 0.0, 0.0, 0.0, 0.0, 1.0],
        ))
        .err()
        .unwrap();
    assert!(err.to_string().contains("poisson"));
}

#[test]
fn registered_laws_are_found_by_family() {
    let mut registry = MaterialRegistry::new();
    registry.register_micropolar_law("Custom", |parameters| {
        Ok(Box::new(LinearElasticMicropolarDamage::from_parameters(parameters)?))
    });
    let spec = MaterialSpec::new("Custom", [100.0, 0.3, 10.0, 0.1, 0.05, 0.01, 0.5]);
    let law = registry.create_micropolar_law(&spec).unwrap();
    assert_eq!(law.number_of_state_variables(), 1);
    // Names are per family
    assert!(registry.create_hypoelastic_law(&spec).is_err());
}

#[test]
fn micropolar_law_without_deformation_is_stress_free() {
    let law = LinearElasticMicropolarDamage::from_parameters(&[100.0, 0.3, 10.0, 0.1, 0.05, 0.01, 0.5]).unwrap();
    let mut state = [0.0];
    law.initialize_state(&mut state);
    assert_eq!(state, [0.01]);

    let increment = DeformationIncrement::from_undeformed(Tensor2::identity(), Tensor1::zeros(), Tensor2::zeros(), 0.0);
    let output = law.compute_response(&mut state, &increment, &TimeIncrement::new(0.0, 1.0), TangentMode::Residual);
    assert!(output.moduli.is_none());
    assert_eq!(output.suggested_timestep_factor, 1.0);
    assert_tensor_eq!(output.response.stress, Tensor2::zeros(), abstol = 0.0);
    assert_tensor_eq!(output.response.couple_stress, Tensor2::zeros(), abstol = 0.0);
    assert_eq!(state, [0.01]);
}

#[test]
fn micropolar_law_rigid_microrotation_matching_macrorotation_is_stress_free() {
    // A small rotation F = I + ε·θ with microrotation W = -θ leaves the Cosserat strain
    // ε = (F - I) + ε·W at zero
    let law = LinearElasticMicropolarDamage::from_parameters(&[100.0, 0.3, 10.0, 0.1, 0.05, 0.01, 0.5]).unwrap();
    let theta = Tensor1::new(0.01, -0.02, 0.03);
    let eps = gemicro::tensor::levi_civita::<f64>();
    let f = Tensor2::identity()
        + Tensor2::from_fn(|[i, j]| (0..3).map(|k| eps[[i, j, k]] * theta[[k]]).sum::<f64>());
    let increment = DeformationIncrement::from_undeformed(f, -theta, Tensor2::zeros(), 0.0);
    let mut state = [0.01];
    let output = law.compute_response(&mut state, &increment, &TimeIncrement::new(0.0, 1.0), TangentMode::Residual);
    assert_tensor_eq!(output.response.stress, Tensor2::zeros(), abstol = 1e-13);
    assert_scalar_eq!(output.response.local_damage, 0.0, comp = abs, tol = 1e-20);
}

#[test]
fn micropolar_law_requests_cutback_for_inverted_elements() {
    let law = LinearElasticMicropolarDamage::from_parameters(&[100.0, 0.3, 10.0, 0.1, 0.05, 0.01, 0.5]).unwrap();
    let f = Tensor2::from_diagonal(&Tensor1::new(1.0, 1.0, -0.5));
    let increment = DeformationIncrement::from_undeformed(f, Tensor1::zeros(), Tensor2::zeros(), 0.0);
    let mut state = [0.01];
    let output = law.compute_response(&mut state, &increment, &TimeIncrement::new(0.0, 1.0), TangentMode::Jacobian);
    assert_eq!(output.suggested_timestep_factor, 0.5);
}

#[test]
fn micropolar_law_history_never_decreases() {
    let law = LinearElasticMicropolarDamage::from_parameters(&[100.0, 0.3, 10.0, 0.1, 0.05, 0.01, 0.5]).unwrap();
    let time = TimeIncrement::new(0.0, 1.0);
    let mut state = [0.01];
    let loaded = DeformationIncrement::from_undeformed(Tensor2::identity(), Tensor1::zeros(), Tensor2::zeros(), 0.3);
    law.compute_response(&mut state, &loaded, &time, TangentMode::Residual);
    assert_eq!(state, [0.3]);

    let unloaded = DeformationIncrement {
        nonlocal_new: 0.1,
        ..loaded
    };
    let output = law.compute_response(&mut state, &unloaded, &time, TangentMode::Jacobian);
    assert_eq!(state, [0.3]);
    // No damage growth on unloading
    let moduli = output.moduli.unwrap();
    assert_tensor_eq!(moduli.ds_dn, Tensor2::zeros(), abstol = 0.0);
}
