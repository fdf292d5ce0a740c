use gemicro::state::MaterialPointStates;
use util::assert_panics;

#[test]
fn element_states_are_created_at_first_touch() {
    let mut states = MaterialPointStates::new(2);
    assert_eq!(states.state_len(), 2);
    assert_eq!(states.num_elements(), 0);

    let element = states.element_mut(3, 4, |state| state[1] = 1.5);
    assert_eq!(element.num_points(), 4);
    assert_eq!(element.state_len(), 2);
    assert_eq!(element.point(2), (&[0.0, 1.5][..], &[0.0, 1.5][..]));

    assert_eq!(states.num_elements(), 1);
    assert!(states.contains_element(3));
    assert!(!states.contains_element(0));
    assert!(states.element(7).is_none());

    // Existing elements are not reinitialized
    let (_, current) = states.element_mut(3, 4, |state| state[1] = 1.5).point_mut(0);
    current[0] = 9.0;
    let element = states.element_mut(3, 4, |state| state.fill(-1.0));
    assert_eq!(element.point(0), (&[0.0, 1.5][..], &[9.0, 1.5][..]));
}

#[test]
fn commit_and_reject() {
    let mut states = MaterialPointStates::new(1);
    for element in [0, 2] {
        let element_states = states.element_mut(element, 2, |_| {});
        let (_, current) = element_states.point_mut(1);
        current[0] = element as f64 + 1.0;
    }

    states.commit();
    for (element, element_states) in states.elements() {
        assert_eq!(element_states.point(1), (&[element as f64 + 1.0][..], &[element as f64 + 1.0][..]));
    }

    {
        let (_, current) = states.element_mut(2, 2, |_| {}).point_mut(1);
        current[0] = 100.0;
    }
    states.reject();
    let (old, current) = states.element(2).unwrap().point(1);
    assert_eq!(old, current);
    assert_eq!(current, &[3.0]);
}

#[test]
fn elements_are_iterated_in_order() {
    let mut states = MaterialPointStates::new(1);
    for element in [5, 1, 3] {
        states.element_mut(element, 1, |_| {});
    }
    let elements: Vec<_> = states.elements().map(|(element, _)| element).collect();
    assert_eq!(elements, vec![1, 3, 5]);

    assert!(states.remove_element(3).is_some());
    assert!(states.remove_element(3).is_none());
    assert!(states.remove_element(42).is_none());
    assert_eq!(states.num_elements(), 2);
}

#[test]
fn changing_number_of_quadrature_points_panics() {
    let mut states = MaterialPointStates::new(1);
    states.element_mut(0, 8, |_| {});
    assert_panics!({
        let mut states = states.clone();
        states.element_mut(0, 4, |_| {});
    });
}
