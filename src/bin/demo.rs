use point_quadtree::quadtree::Quadtree;
use point_quadtree::Point;

fn main() {
    let mut qt = Quadtree::with_point(Point::new(5.0, 5.0));
    qt.insert(Point::new(10.0, 10.0));
    qt.insert(Point::new(8.0, 8.0));
    qt.insert(Point::new(2.0, 2.0));
    qt.insert(Point::new(3.0, 3.0));
    qt.insert(Point::new(7.0, 3.0));
    println!("{}", qt);
}
